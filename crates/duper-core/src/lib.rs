//! # duper-core
//!
//! Pure-Rust implementation of **Duper**, a human-readable, typed, tagged
//! serialization format. Duper sits between a plain structured-data notation
//! and a self-describing object graph: composite values may carry a named
//! tag (`User({...})`) identifying the intended host type, alongside
//! anonymous maps, lists, and scalars.
//!
//! Decoding runs text → lexer → parser → [`DuperValue`] tree → binder
//! (consulting a [`TypeRegistry`]) → [`BoundValue`]. Encoding walks a
//! [`BoundValue`] back through the registry into canonical Duper text.
//!
//! ## Quick start
//!
//! ```rust
//! use duper_core::{dumps, loads, SerializeOptions, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//!
//! let value = loads("[1, 2, 3]", &registry).unwrap();
//! assert_eq!(dumps(&value, &registry, SerializeOptions::default()).unwrap(), "[1, 2, 3]");
//!
//! // Unknown tags survive the round trip verbatim.
//! let point = loads("Point({x: 1, y: 2})", &registry).unwrap();
//! assert_eq!(
//!     dumps(&point, &registry, SerializeOptions::default()).unwrap(),
//!     "Point({x: 1, y: 2})",
//! );
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] — source text → token stream
//! - [`parser`] — token stream → [`DuperValue`] tree
//! - [`registry`] — tag name → host-type binding hooks
//! - [`binder`] — [`DuperValue`] → [`BoundValue`] resolution
//! - [`serializer`] — [`BoundValue`] → canonical Duper text
//! - [`json`] — `serde_json::Value` interop (the `Native` output mode)
//! - [`error`] — the `Lex`/`Parse`/`Bind`/`Encode` error taxonomy
//!
//! The core performs no I/O of its own beyond the single full read or write
//! of the [`load`]/[`dump`] variants, and holds no global state: the
//! registry is built during initialization and passed by reference into
//! every call, which also makes concurrent `loads`/`dumps` from different
//! threads safe.

pub mod binder;
pub mod error;
pub mod json;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod serializer;
pub mod types;

use std::io;

pub use binder::{bind, BoundValue};
pub use error::{DuperError, Position, Result};
pub use parser::parse;
pub use registry::{Constructor, Decomposer, RegistryError, TypeBinding, TypeRegistry};
pub use serializer::{
    decompose, serialize, serialize_tree, SerializeOptions, UntaggedMapPolicy, UNKNOWN_MAP_TAG,
};
pub use types::{is_identifier, DuperValue};

/// Content-type marker for Duper payloads. Enforcing it on requests is the
/// web collaborator's job, not the core's.
pub static DUPER_CONTENT_TYPE: &str = "application/duper";
pub static DUPER_ALT_CONTENT_TYPE: &str = "application/x-duper";

/// Decode a complete Duper document: lex, parse, bind.
///
/// Fails with the first error in pipeline order — lex errors preempt parse
/// errors, which preempt bind errors.
pub fn loads(text: &str, registry: &TypeRegistry) -> Result<BoundValue> {
    bind(parse(text)?, registry)
}

/// Read all bytes from `source`, then decode as with [`loads`].
///
/// The source is caller-supplied and caller-closed; the core performs
/// exactly one full read.
pub fn load<R: io::Read>(mut source: R, registry: &TypeRegistry) -> Result<BoundValue> {
    let mut buf = Vec::new();
    source.read_to_end(&mut buf)?;
    let text = std::str::from_utf8(&buf)?;
    loads(text, registry)
}

/// Encode a bound value to a complete Duper document (no trailing newline).
pub fn dumps(
    value: &BoundValue,
    registry: &TypeRegistry,
    options: SerializeOptions,
) -> Result<String> {
    serialize(value, registry, options)
}

/// Encode as with [`dumps`] and write the document to `sink` in one write.
pub fn dump<W: io::Write>(
    value: &BoundValue,
    mut sink: W,
    registry: &TypeRegistry,
    options: SerializeOptions,
) -> Result<()> {
    let text = serialize(value, registry, options)?;
    sink.write_all(text.as_bytes())?;
    Ok(())
}

/// Output selector for the data-binding integration: an explicit enum in
/// place of runtime handler substitution. `Duper` renders canonical Duper
/// text; `Native` renders the host-native representation (JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Duper,
    Native,
}

/// Render a bound value in the requested [`OutputMode`].
pub fn render(
    value: &BoundValue,
    registry: &TypeRegistry,
    mode: OutputMode,
    options: SerializeOptions,
) -> Result<String> {
    match mode {
        OutputMode::Duper => serialize(value, registry, options),
        OutputMode::Native => {
            serde_json::to_string(&json::to_json(value)).map_err(|err| DuperError::Encode {
                reason: err.to_string(),
            })
        }
    }
}
