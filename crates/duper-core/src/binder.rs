//! Resolution of parsed value trees into bound host values.
//!
//! Binding is purely structural recursion — the parsed tree is acyclic by
//! construction, so there is no cycle risk and no bookkeeping. The three
//! composite outcomes are kept distinct on purpose:
//!
//! - [`BoundValue::Known`] — the tag had a registered constructor
//! - [`BoundValue::UnknownTagged`] — the tag had no registration; both the
//!   tag and the payload are preserved for the return trip
//! - [`BoundValue::UntaggedMap`] — a bare map, which carries no tag at all
//!
//! Collapsing the last two into one fallback is what produced the historical
//! `DuperUnknown` asymmetry documented in the serializer; keeping them apart
//! lets the integrator choose the output shape per call.

use crate::error::{DuperError, Result};
use crate::registry::TypeRegistry;
use crate::types::DuperValue;

/// A host-side value produced by [`bind`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<BoundValue>),
    /// An instance of a registered type: the canonical tag plus the payload
    /// returned by the type's constructor.
    Known {
        tag: String,
        payload: Box<BoundValue>,
    },
    /// A tagged value whose tag has no registration. The original tag is
    /// preserved verbatim so serialization can reproduce it.
    UnknownTagged {
        tag: String,
        payload: Box<BoundValue>,
    },
    /// A bare map. Field order is preserved; duplicates are not collapsed.
    UntaggedMap(Vec<(String, BoundValue)>),
}

impl BoundValue {
    /// The tag carried by this value, if any.
    pub fn tag(&self) -> Option<&str> {
        match self {
            BoundValue::Known { tag, .. } | BoundValue::UnknownTagged { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Convenience constructor for building map-shaped payloads in host code.
    pub fn map(fields: impl IntoIterator<Item = (String, BoundValue)>) -> Self {
        BoundValue::UntaggedMap(fields.into_iter().collect())
    }
}

/// Resolve a parsed [`DuperValue`] into a [`BoundValue`] using `registry`.
///
/// Registered tags run their constructor over the recursively bound payload;
/// a constructor rejection surfaces as [`DuperError::Bind`] and binding
/// stops — no alternate binding is attempted. Unregistered tags and bare
/// maps fall back to the generic containers described on [`BoundValue`].
pub fn bind(value: DuperValue, registry: &TypeRegistry) -> Result<BoundValue> {
    match value {
        DuperValue::Null => Ok(BoundValue::Null),
        DuperValue::Bool(b) => Ok(BoundValue::Bool(b)),
        DuperValue::Integer(i) => Ok(BoundValue::Integer(i)),
        DuperValue::Float(f) => Ok(BoundValue::Float(f)),
        DuperValue::String(s) => Ok(BoundValue::String(s)),
        DuperValue::List(items) => {
            let bound = items
                .into_iter()
                .map(|item| bind(item, registry))
                .collect::<Result<Vec<_>>>()?;
            Ok(BoundValue::List(bound))
        }
        DuperValue::Map(entries) => {
            let bound = entries
                .into_iter()
                .map(|(key, item)| Ok((key, bind(item, registry)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(BoundValue::UntaggedMap(bound))
        }
        DuperValue::Tagged { tag, value } => {
            let payload = bind(*value, registry)?;
            match registry.get(&tag) {
                Some(binding) => match binding.construct(payload) {
                    Ok(constructed) => Ok(BoundValue::Known {
                        tag: binding.tag().to_string(),
                        payload: Box::new(constructed),
                    }),
                    Err(cause) => Err(DuperError::Bind { tag, cause }),
                },
                None => Ok(BoundValue::UnknownTagged {
                    tag,
                    payload: Box::new(payload),
                }),
            }
        }
    }
}
