//! The type registry: tag names mapped to host-side binding hooks.
//!
//! The registry is built once during initialization — typically by the
//! external validation layer registering its record types — and then passed
//! by shared reference into every decode and encode call. It is immutable
//! after construction, so a `&TypeRegistry` can be handed to any number of
//! threads without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::binder::BoundValue;
use crate::types::{is_identifier, DuperValue};

/// Constructor hook: receives the recursively bound payload of a tagged
/// value, validates or normalizes it, and returns the payload stored inside
/// [`BoundValue::Known`]. An `Err` surfaces as [`crate::DuperError::Bind`].
pub type Constructor = Arc<dyn Fn(BoundValue) -> Result<BoundValue, String> + Send + Sync>;

/// Decomposer hook: converts a [`BoundValue::Known`] payload back into a
/// wire payload on encode. When absent, the payload is decomposed
/// structurally. An `Err` surfaces as [`crate::DuperError::Encode`].
pub type Decomposer = Arc<dyn Fn(&BoundValue) -> Result<DuperValue, String> + Send + Sync>;

/// Errors raised while populating a [`TypeRegistry`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("`{0}` is not a valid tag: tags match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidTag(String),

    #[error("tag `{0}` is already registered")]
    DuplicateTag(String),
}

/// One registered host type: a tag name plus its construction and
/// decomposition hooks.
#[derive(Clone)]
pub struct TypeBinding {
    tag: String,
    constructor: Constructor,
    decomposer: Option<Decomposer>,
}

impl TypeBinding {
    /// Create a binding whose constructor passes the payload through
    /// unchanged. Fails when `tag` does not match identifier syntax.
    pub fn new(tag: impl Into<String>) -> Result<Self, RegistryError> {
        let tag = tag.into();
        if !is_identifier(&tag) {
            return Err(RegistryError::InvalidTag(tag));
        }
        Ok(Self {
            tag,
            constructor: Arc::new(|payload| Ok(payload)),
            decomposer: None,
        })
    }

    /// Replace the constructor hook.
    pub fn with_constructor(
        mut self,
        constructor: impl Fn(BoundValue) -> Result<BoundValue, String> + Send + Sync + 'static,
    ) -> Self {
        self.constructor = Arc::new(constructor);
        self
    }

    /// Set the decomposer hook.
    pub fn with_decomposer(
        mut self,
        decomposer: impl Fn(&BoundValue) -> Result<DuperValue, String> + Send + Sync + 'static,
    ) -> Self {
        self.decomposer = Some(Arc::new(decomposer));
        self
    }

    /// The canonical tag name this binding serializes under.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub(crate) fn construct(&self, payload: BoundValue) -> Result<BoundValue, String> {
        (self.constructor)(payload)
    }

    pub(crate) fn decompose(&self, payload: &BoundValue) -> Option<Result<DuperValue, String>> {
        self.decomposer.as_ref().map(|f| f(payload))
    }
}

impl fmt::Debug for TypeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeBinding")
            .field("tag", &self.tag)
            .field("has_decomposer", &self.decomposer.is_some())
            .finish()
    }
}

/// Tag name → [`TypeBinding`] lookup table.
///
/// There is no removal API: the lifecycle is register-everything-then-read.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: HashMap<String, TypeBinding>,
}

impl TypeRegistry {
    /// An empty registry. Decoding with it binds every tagged value to an
    /// unknown-tagged container, which is exactly what generic tooling
    /// (formatters, inspectors) wants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding under its tag. Registering the same tag twice is
    /// an error; the lifecycle contract is populate-once.
    pub fn register(&mut self, binding: TypeBinding) -> Result<(), RegistryError> {
        if self.entries.contains_key(binding.tag()) {
            return Err(RegistryError::DuplicateTag(binding.tag().to_string()));
        }
        self.entries.insert(binding.tag().to_string(), binding);
        Ok(())
    }

    /// Look up the binding for a tag, if one was registered.
    pub fn get(&self, tag: &str) -> Option<&TypeBinding> {
        self.entries.get(tag)
    }

    /// Whether `tag` has a registered binding.
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
