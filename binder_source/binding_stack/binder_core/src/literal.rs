//! Canonical string encodings for literal arguments.
//!
//! Every [`LiteralKind`] has one encode/decode pair and one zero value. Adding
//! a kind means extending each match below; there is no open type switch.

use std::fmt;
use std::str::FromStr;

use binder_structs::{Color, Vector2, Vector3, Vector4};
use binder_variant::{EnumType, Number, ValueType, Variant};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    String,
    Bool,
    Int,
    Float,
    Double,
    Vector2,
    Vector3,
    Vector4,
    Color,
    EnumName,
}

impl LiteralKind {
    /// The literal kind able to produce `ty`, or `None` for reference-only types.
    pub fn for_type(ty: &ValueType) -> Option<Self> {
        Some(match ty {
            ValueType::String => LiteralKind::String,
            ValueType::Bool => LiteralKind::Bool,
            ValueType::Int => LiteralKind::Int,
            ValueType::Float => LiteralKind::Float,
            ValueType::Double => LiteralKind::Double,
            ValueType::Vector2 => LiteralKind::Vector2,
            ValueType::Vector3 => LiteralKind::Vector3,
            ValueType::Vector4 => LiteralKind::Vector4,
            ValueType::Color => LiteralKind::Color,
            ValueType::Enum(_) => LiteralKind::EnumName,
            ValueType::Object | ValueType::Component(_) => return None,
        })
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralKind::String => "String",
            LiteralKind::Bool => "Bool",
            LiteralKind::Int => "Int",
            LiteralKind::Float => "Float",
            LiteralKind::Double => "Double",
            LiteralKind::Vector2 => "Vector2",
            LiteralKind::Vector3 => "Vector3",
            LiteralKind::Vector4 => "Vector4",
            LiteralKind::Color => "Color",
            LiteralKind::EnumName => "EnumName",
        };
        f.write_str(name)
    }
}

/// Zero value of `kind` for a slot declared as `declared`.
///
/// Enum slots default to their first declared member; an enum without
/// members has no zero value and yields `Null`.
pub fn zero_value(kind: LiteralKind, declared: &ValueType) -> Variant {
    match kind {
        LiteralKind::String => Variant::string(""),
        LiteralKind::Bool => Variant::Bool(false),
        LiteralKind::Int => Variant::Number(Number::I32(0)),
        LiteralKind::Float => Variant::Number(Number::F32(0.0)),
        LiteralKind::Double => Variant::Number(Number::F64(0.0)),
        LiteralKind::Vector2 => Variant::Vector2(Vector2::zero()),
        LiteralKind::Vector3 => Variant::Vector3(Vector3::zero()),
        LiteralKind::Vector4 => Variant::Vector4(Vector4::zero()),
        LiteralKind::Color => Variant::Color(Color::clear()),
        LiteralKind::EnumName => match declared {
            ValueType::Enum(e) => match e.first() {
                Some(first) => Variant::enum_value(&e.name, first),
                None => Variant::Null,
            },
            _ => Variant::Null,
        },
    }
}

/// Canonical encoding of the zero value, used for fresh binding slots.
pub fn zero_encoding(kind: LiteralKind, declared: &ValueType) -> String {
    encode(&zero_value(kind, declared))
        .map(|(_, text)| text)
        .unwrap_or_default()
}

/// Decode `input` as a literal of `kind` for a slot declared as `declared`.
pub fn decode(kind: LiteralKind, input: &str, declared: &ValueType) -> Result<Variant, DecodeError> {
    if LiteralKind::for_type(declared) != Some(kind) {
        return Err(DecodeError::KindMismatch {
            kind,
            declared: declared.clone(),
        });
    }

    // Strings are taken verbatim, including the empty string.
    if kind == LiteralKind::String {
        return Ok(Variant::string(input));
    }

    let text = input.trim();
    if text.is_empty() {
        return Err(DecodeError::Empty { kind });
    }

    match kind {
        LiteralKind::String => unreachable!("handled above"),
        LiteralKind::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Ok(Variant::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Variant::Bool(false))
            } else {
                Err(malformed(kind, input, "expected `true` or `false`"))
            }
        }
        LiteralKind::Int => parse_scalar::<i32>(kind, input, text).map(Variant::from),
        LiteralKind::Float => parse_scalar::<f32>(kind, input, text).map(Variant::from),
        LiteralKind::Double => parse_scalar::<f64>(kind, input, text).map(Variant::from),
        LiteralKind::Vector2 => {
            parse_components::<2>(kind, input, text).map(|c| Vector2::from_array(c).into())
        }
        LiteralKind::Vector3 => {
            parse_components::<3>(kind, input, text).map(|c| Vector3::from_array(c).into())
        }
        LiteralKind::Vector4 => {
            parse_components::<4>(kind, input, text).map(|c| Vector4::from_array(c).into())
        }
        LiteralKind::Color => {
            if text.starts_with('#') {
                Color::from_hex(text)
                    .map(Variant::from)
                    .map_err(|reason| malformed(kind, input, &reason))
            } else {
                parse_components::<4>(kind, input, text).map(|c| Color::from_array(c).into())
            }
        }
        LiteralKind::EnumName => match declared {
            ValueType::Enum(e) => decode_enum(e, text),
            _ => unreachable!("kind already checked against declared type"),
        },
    }
}

/// Canonical encoding of a literal-representable value.
pub fn encode(value: &Variant) -> Option<(LiteralKind, String)> {
    Some(match value {
        Variant::String(s) => (LiteralKind::String, s.to_string()),
        Variant::Bool(b) => (LiteralKind::Bool, b.to_string()),
        Variant::Number(Number::I32(v)) => (LiteralKind::Int, v.to_string()),
        Variant::Number(Number::F32(v)) => (LiteralKind::Float, v.to_string()),
        Variant::Number(Number::F64(v)) => (LiteralKind::Double, v.to_string()),
        Variant::Vector2(v) => (LiteralKind::Vector2, join(&v.to_array())),
        Variant::Vector3(v) => (LiteralKind::Vector3, join(&v.to_array())),
        Variant::Vector4(v) => (LiteralKind::Vector4, join(&v.to_array())),
        Variant::Color(c) => (LiteralKind::Color, join(&c.to_array())),
        Variant::Enum { name, .. } => (LiteralKind::EnumName, name.to_string()),
        Variant::Null | Variant::Object(_) | Variant::Component { .. } => return None,
    })
}

fn decode_enum(ty: &EnumType, text: &str) -> Result<Variant, DecodeError> {
    if ty.contains(text) {
        Ok(Variant::enum_value(&ty.name, text))
    } else {
        Err(DecodeError::UnknownEnumMember {
            ty: ty.name.to_string(),
            input: text.to_string(),
        })
    }
}

fn parse_scalar<T>(kind: LiteralKind, input: &str, text: &str) -> Result<T, DecodeError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.parse::<T>()
        .map_err(|e| malformed(kind, input, &e.to_string()))
}

fn parse_components<const N: usize>(
    kind: LiteralKind,
    input: &str,
    text: &str,
) -> Result<[f32; N], DecodeError> {
    // Accept the parenthesised form engines print, e.g. "(1.0, 2.0)".
    let inner = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(text);

    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != N {
        return Err(malformed(
            kind,
            input,
            &format!("expected {N} components, found {}", parts.len()),
        ));
    }

    let mut out = [0.0f32; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_scalar::<f32>(kind, input, part.trim())?;
    }
    Ok(out)
}

fn join(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn malformed(kind: LiteralKind, input: &str, reason: &str) -> DecodeError {
    DecodeError::Malformed {
        kind,
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
