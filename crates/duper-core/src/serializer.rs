//! Serialization of bound values back into canonical Duper text.
//!
//! Encoding runs in two stages. **Decompose** turns a [`BoundValue`] back
//! into a [`DuperValue`] tree, consulting the registry for canonical tag
//! names and decomposer hooks and applying the untagged-map policy. **Emit**
//! renders the tree as text — canonical single-line form by default, or the
//! multi-line pretty form when an indent width is given.
//!
//! Canonical form rules: insertion order everywhere; bare keys when they
//! match identifier syntax, quoted otherwise; a single space after `:` and
//! `,`; no trailing commas; no other insignificant whitespace. The output is
//! deterministic and diff-friendly.

use std::fmt::Write as _;

use crate::binder::BoundValue;
use crate::error::{DuperError, Result};
use crate::registry::TypeRegistry;
use crate::types::{is_identifier, DuperValue};

/// Tag emitted for an untagged map under [`UntaggedMapPolicy::TagUnknown`].
pub const UNKNOWN_MAP_TAG: &str = "DuperUnknown";

/// What to do with a [`BoundValue::UntaggedMap`] on output.
///
/// Historically, bare maps came back as `DuperUnknown({...})` even though
/// they carried no tag on input. That asymmetry stays the default so
/// existing consumers keep seeing it; [`UntaggedMapPolicy::Plain`] is the
/// symmetric alternative for integrators that want bare maps back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UntaggedMapPolicy {
    /// Wrap bare maps as `DuperUnknown({...})` (historical default).
    #[default]
    TagUnknown,
    /// Emit bare maps as `{...}`.
    Plain,
}

/// Options accepted by [`serialize`] and the top-level `dumps`/`dump`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    /// Omit every tag, emitting payloads only. Applies uniformly: registered
    /// tags, preserved unknown tags, and the `DuperUnknown` wrapper alike.
    pub strip_identifiers: bool,
    pub untagged_maps: UntaggedMapPolicy,
    /// `None` → canonical single-line output. `Some(n)` → pretty output with
    /// `n`-space indent steps, one entry per line, trailing commas.
    pub indent: Option<usize>,
}

impl SerializeOptions {
    pub fn strip_identifiers(mut self, strip: bool) -> Self {
        self.strip_identifiers = strip;
        self
    }

    pub fn untagged_maps(mut self, policy: UntaggedMapPolicy) -> Self {
        self.untagged_maps = policy;
        self
    }

    pub fn indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }
}

/// Serialize a bound value to Duper text.
pub fn serialize(
    value: &BoundValue,
    registry: &TypeRegistry,
    options: SerializeOptions,
) -> Result<String> {
    let tree = decompose(value, registry, options.untagged_maps)?;
    serialize_tree(&tree, options)
}

/// Convert a bound value back into a [`DuperValue`] tree, consulting the
/// registry for decomposer hooks and canonical tag names.
pub fn decompose(
    value: &BoundValue,
    registry: &TypeRegistry,
    policy: UntaggedMapPolicy,
) -> Result<DuperValue> {
    match value {
        BoundValue::Null => Ok(DuperValue::Null),
        BoundValue::Bool(b) => Ok(DuperValue::Bool(*b)),
        BoundValue::Integer(i) => Ok(DuperValue::Integer(*i)),
        BoundValue::Float(f) => Ok(DuperValue::Float(*f)),
        BoundValue::String(s) => Ok(DuperValue::String(s.clone())),
        BoundValue::List(items) => {
            let decomposed = items
                .iter()
                .map(|item| decompose(item, registry, policy))
                .collect::<Result<Vec<_>>>()?;
            Ok(DuperValue::List(decomposed))
        }
        BoundValue::UntaggedMap(fields) => {
            let map = DuperValue::Map(decompose_fields(fields, registry, policy)?);
            match policy {
                UntaggedMapPolicy::TagUnknown => Ok(DuperValue::Tagged {
                    tag: UNKNOWN_MAP_TAG.to_string(),
                    value: Box::new(map),
                }),
                UntaggedMapPolicy::Plain => Ok(map),
            }
        }
        BoundValue::UnknownTagged { tag, payload } => Ok(DuperValue::Tagged {
            tag: tag.clone(),
            value: Box::new(decompose_payload(payload, registry, policy)?),
        }),
        BoundValue::Known { tag, payload } => match registry.get(tag) {
            Some(binding) => {
                let tree = match binding.decompose(payload) {
                    Some(result) => {
                        let tree = result.map_err(|cause| DuperError::Encode {
                            reason: format!("decomposer for tag `{tag}` failed: {cause}"),
                        })?;
                        if matches!(tree, DuperValue::Tagged { .. }) {
                            return Err(DuperError::Encode {
                                reason: format!("decomposer for tag `{tag}` returned a tagged payload"),
                            });
                        }
                        tree
                    }
                    None => decompose_payload(payload, registry, policy)?,
                };
                Ok(DuperValue::Tagged {
                    tag: binding.tag().to_string(),
                    value: Box::new(tree),
                })
            }
            // A hand-built Known whose tag was never registered degrades to
            // the unknown-tagged shape.
            None => Ok(DuperValue::Tagged {
                tag: tag.clone(),
                value: Box::new(decompose_payload(payload, registry, policy)?),
            }),
        },
    }
}

fn decompose_fields(
    fields: &[(String, BoundValue)],
    registry: &TypeRegistry,
    policy: UntaggedMapPolicy,
) -> Result<Vec<(String, DuperValue)>> {
    fields
        .iter()
        .map(|(key, item)| Ok((key.clone(), decompose(item, registry, policy)?)))
        .collect()
}

/// Decompose the direct payload of a tagged value. The payload map itself is
/// emitted bare inside the parentheses — the untagged-map policy applies only
/// to maps that are not a tag's payload, so `Point({x: 1})` never becomes
/// `Point(DuperUnknown({x: 1}))`.
fn decompose_payload(
    payload: &BoundValue,
    registry: &TypeRegistry,
    policy: UntaggedMapPolicy,
) -> Result<DuperValue> {
    match payload {
        BoundValue::UntaggedMap(fields) => {
            Ok(DuperValue::Map(decompose_fields(fields, registry, policy)?))
        }
        other => decompose(other, registry, policy),
    }
}

/// Emit a [`DuperValue`] tree as text, without registry involvement.
pub fn serialize_tree(value: &DuperValue, options: SerializeOptions) -> Result<String> {
    let mut out = String::new();
    match options.indent {
        None => write_value(value, &mut out, options.strip_identifiers)?,
        Some(step) => write_value_pretty(value, &mut out, options.strip_identifiers, step, 0)?,
    }
    Ok(out)
}

fn write_value(value: &DuperValue, out: &mut String, strip: bool) -> Result<()> {
    match value {
        DuperValue::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out, strip)?;
            }
            out.push(']');
        }
        DuperValue::Map(entries) => {
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_key(key, out);
                out.push_str(": ");
                write_value(item, out, strip)?;
            }
            out.push('}');
        }
        DuperValue::Tagged { tag, value } => {
            if strip {
                write_value(value, out, strip)?;
            } else {
                write_tag(tag, out)?;
                out.push('(');
                write_value(value, out, strip)?;
                out.push(')');
            }
        }
        scalar => write_atom(scalar, out)?,
    }
    Ok(())
}

fn write_value_pretty(
    value: &DuperValue,
    out: &mut String,
    strip: bool,
    step: usize,
    depth: usize,
) -> Result<()> {
    match value {
        DuperValue::List(items) if items.is_empty() => out.push_str("[]"),
        DuperValue::List(items) => {
            out.push_str("[\n");
            for item in items {
                push_indent(out, step, depth + 1);
                write_value_pretty(item, out, strip, step, depth + 1)?;
                out.push_str(",\n");
            }
            push_indent(out, step, depth);
            out.push(']');
        }
        DuperValue::Map(entries) if entries.is_empty() => out.push_str("{}"),
        DuperValue::Map(entries) => {
            out.push_str("{\n");
            for (key, item) in entries {
                push_indent(out, step, depth + 1);
                write_key(key, out);
                out.push_str(": ");
                write_value_pretty(item, out, strip, step, depth + 1)?;
                out.push_str(",\n");
            }
            push_indent(out, step, depth);
            out.push('}');
        }
        DuperValue::Tagged { tag, value } => {
            if strip {
                write_value_pretty(value, out, strip, step, depth)?;
            } else {
                write_tag(tag, out)?;
                out.push('(');
                write_value_pretty(value, out, strip, step, depth)?;
                out.push(')');
            }
        }
        scalar => write_atom(scalar, out)?,
    }
    Ok(())
}

fn push_indent(out: &mut String, step: usize, depth: usize) {
    for _ in 0..step * depth {
        out.push(' ');
    }
}

/// Emit a scalar leaf. Non-finite floats have no literal form and are
/// rejected here.
fn write_atom(value: &DuperValue, out: &mut String) -> Result<()> {
    match value {
        DuperValue::Null => out.push_str("null"),
        DuperValue::Bool(true) => out.push_str("true"),
        DuperValue::Bool(false) => out.push_str("false"),
        DuperValue::Integer(i) => {
            let _ = write!(out, "{i}");
        }
        DuperValue::Float(f) => out.push_str(&format_float(*f)?),
        DuperValue::String(s) => write_string(s, out),
        _ => {}
    }
    Ok(())
}

fn write_tag(tag: &str, out: &mut String) -> Result<()> {
    if !is_identifier(tag) {
        return Err(DuperError::Encode {
            reason: format!("`{tag}` is not a valid tag name"),
        });
    }
    out.push_str(tag);
    Ok(())
}

fn write_key(key: &str, out: &mut String) {
    if is_identifier(key) {
        out.push_str(key);
    } else {
        write_string(key, out);
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x08' => out.push_str("\\b"),
            '\x0C' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Shortest round-trippable decimal form. Integral floats keep a `.0` suffix
/// so the float/integer distinction survives a parse.
fn format_float(f: f64) -> Result<String> {
    if !f.is_finite() {
        return Err(DuperError::Encode {
            reason: format!("cannot represent non-finite float `{f}`"),
        });
    }
    let mut s = f.to_string();
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push_str(".0");
    }
    Ok(s)
}
