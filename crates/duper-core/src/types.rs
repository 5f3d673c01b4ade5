//! The intermediate Duper value tree produced by the parser.

/// A parsed Duper document value. Integers and floats are kept apart (Duper
/// preserves the distinction through round trips) and maps use
/// `Vec<(String, DuperValue)>` to maintain insertion order — including
/// duplicate keys, which are preserved rather than collapsed.
#[derive(Debug, Clone, PartialEq)]
pub enum DuperValue {
    Null,
    Bool(bool),
    /// Fixed-width signed integer. Literals outside `i64` range are rejected
    /// by the lexer rather than wrapped or promoted.
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<DuperValue>),
    /// Key-value pairs in insertion order.
    Map(Vec<(String, DuperValue)>),
    /// A tagged composite: `Tag(payload)`. The tag is a non-empty identifier
    /// and the payload is a map, list, or scalar — never another tagged
    /// value.
    Tagged {
        tag: String,
        value: Box<DuperValue>,
    },
}

impl DuperValue {
    /// The tag carried by this value, if any.
    pub fn tag(&self) -> Option<&str> {
        match self {
            DuperValue::Tagged { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            DuperValue::Null
                | DuperValue::Bool(_)
                | DuperValue::Integer(_)
                | DuperValue::Float(_)
                | DuperValue::String(_)
        )
    }
}

/// Test whether `s` matches identifier syntax: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// One token class serves both tag names and bare map keys. The reserved
/// words `null`, `true`, and `false` are identifiers to the lexer; the
/// parser gives them their scalar meaning by context.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
