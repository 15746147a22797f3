// binder_variant/src/variant.rs

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::Arc;

use binder_ids::ObjectID;
use binder_structs::*;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    I32(i32),
    F32(f32),
    F64(f64),
}

impl Number {
    #[inline]
    pub const fn is_int(&self) -> bool {
        matches!(self, Number::I32(_))
    }

    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::F32(_) | Number::F64(_))
    }

    #[inline]
    pub fn as_f64_lossy(&self) -> f64 {
        match *self {
            Number::I32(v) => v as f64,
            Number::F32(v) => v as f64,
            Number::F64(v) => v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I32(v) => write!(f, "{v}"),
            Number::F32(v) => write!(f, "{v}"),
            Number::F64(v) => write!(f, "{v}"),
        }
    }
}

/// A dynamically typed argument or return value of a bound call.
#[derive(Clone, Debug, PartialEq)]
pub enum Variant {
    // --- Nullary ---
    Null,

    // --- Primitives ---
    Bool(bool),
    Number(Number),
    String(Arc<str>),

    // --- Math primitives ---
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Color(Color),

    /// A named member of a declared enum type.
    Enum { ty: Arc<str>, name: Arc<str> },

    // --- Live handles ---
    Object(ObjectID),
    Component { object: ObjectID, ty: Arc<str> },
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Null => write!(f, "null"),
            Variant::Bool(v) => write!(f, "{v}"),
            Variant::Number(v) => write!(f, "{v}"),
            Variant::String(v) => write!(f, "{:?}", &**v),
            Variant::Vector2(v) => write!(f, "({}, {})", v.x, v.y),
            Variant::Vector3(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            Variant::Vector4(v) => write!(f, "({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Variant::Color(c) => write!(f, "rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a),
            Variant::Enum { ty, name } => write!(f, "{ty}::{name}"),
            Variant::Object(id) => write!(f, "object {id}"),
            Variant::Component { object, ty } => write!(f, "{ty} on object {object}"),
        }
    }
}

// -------------------- Constructors --------------------

impl Variant {
    #[inline]
    pub const fn null() -> Self {
        Variant::Null
    }
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    #[inline]
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        Variant::String(Arc::<str>::from(s.as_ref()))
    }

    #[inline]
    pub fn enum_value(ty: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Variant::Enum {
            ty: Arc::from(ty.as_ref()),
            name: Arc::from(name.as_ref()),
        }
    }

    #[inline]
    pub fn component(object: ObjectID, ty: impl AsRef<str>) -> Self {
        Variant::Component {
            object,
            ty: Arc::from(ty.as_ref()),
        }
    }

    /// Short name of the runtime type, used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Variant::Null => "Null",
            Variant::Bool(_) => "Bool",
            Variant::Number(Number::I32(_)) => "Int",
            Variant::Number(Number::F32(_)) => "Float",
            Variant::Number(Number::F64(_)) => "Double",
            Variant::String(_) => "String",
            Variant::Vector2(_) => "Vector2",
            Variant::Vector3(_) => "Vector3",
            Variant::Vector4(_) => "Vector4",
            Variant::Color(_) => "Color",
            Variant::Enum { ty, .. } => ty,
            Variant::Object(_) => "Object",
            Variant::Component { ty, .. } => ty,
        }
    }
}

// -------------------- Accessors --------------------

impl Variant {
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Variant::Bool(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Variant::Number(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Variant::Number(Number::I32(v)) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            Variant::Number(Number::F32(v)) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Variant::Number(Number::F64(v)) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vec2(&self) -> Option<Vector2> {
        match *self {
            Variant::Vector2(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vec3(&self) -> Option<Vector3> {
        match *self {
            Variant::Vector3(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vec4(&self) -> Option<Vector4> {
        match *self {
            Variant::Vector4(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_color(&self) -> Option<Color> {
        match *self {
            Variant::Color(c) => Some(c),
            _ => None,
        }
    }

    /// Enum member name, if this is an enum value.
    #[inline]
    pub fn as_enum_name(&self) -> Option<&str> {
        match self {
            Variant::Enum { name, .. } => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<ObjectID> {
        match *self {
            Variant::Object(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_component(&self) -> Option<(ObjectID, &str)> {
        match self {
            Variant::Component { object, ty } => Some((*object, ty)),
            _ => None,
        }
    }
}

// -------------------- From impls --------------------

impl From<bool> for Variant {
    #[inline]
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}
impl From<Number> for Variant {
    #[inline]
    fn from(v: Number) -> Self {
        Variant::Number(v)
    }
}
impl From<i32> for Variant {
    #[inline]
    fn from(v: i32) -> Self {
        Variant::Number(Number::I32(v))
    }
}
impl From<f32> for Variant {
    #[inline]
    fn from(v: f32) -> Self {
        Variant::Number(Number::F32(v))
    }
}
impl From<f64> for Variant {
    #[inline]
    fn from(v: f64) -> Self {
        Variant::Number(Number::F64(v))
    }
}

impl From<&str> for Variant {
    #[inline]
    fn from(v: &str) -> Self {
        Variant::String(Arc::<str>::from(v))
    }
}
impl From<String> for Variant {
    #[inline]
    fn from(v: String) -> Self {
        Variant::String(Arc::<str>::from(v))
    }
}
impl From<Arc<str>> for Variant {
    #[inline]
    fn from(v: Arc<str>) -> Self {
        Variant::String(v)
    }
}

impl From<Vector2> for Variant {
    #[inline]
    fn from(v: Vector2) -> Self {
        Variant::Vector2(v)
    }
}
impl From<Vector3> for Variant {
    #[inline]
    fn from(v: Vector3) -> Self {
        Variant::Vector3(v)
    }
}
impl From<Vector4> for Variant {
    #[inline]
    fn from(v: Vector4) -> Self {
        Variant::Vector4(v)
    }
}
impl From<Color> for Variant {
    #[inline]
    fn from(v: Color) -> Self {
        Variant::Color(v)
    }
}

impl From<ObjectID> for Variant {
    #[inline]
    fn from(v: ObjectID) -> Self {
        Variant::Object(v)
    }
}

// -------------------- JSON conversion --------------------

impl Variant {
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Variant::Null => JsonValue::Null,
            Variant::Bool(v) => JsonValue::Bool(*v),
            Variant::Number(Number::I32(v)) => JsonValue::Number(JsonNumber::from(*v)),
            Variant::Number(Number::F32(v)) => float_to_json(*v as f64),
            Variant::Number(Number::F64(v)) => float_to_json(*v),
            Variant::String(v) => JsonValue::String(v.to_string()),
            Variant::Vector2(v) => float_map(&["x", "y"], &v.to_array()),
            Variant::Vector3(v) => float_map(&["x", "y", "z"], &v.to_array()),
            Variant::Vector4(v) => float_map(&["x", "y", "z", "w"], &v.to_array()),
            Variant::Color(c) => float_map(&["r", "g", "b", "a"], &c.to_array()),
            Variant::Enum { name, .. } => JsonValue::String(name.to_string()),
            Variant::Object(id) => JsonValue::Number(JsonNumber::from(id.as_u64())),
            Variant::Component { object, ty } => {
                let mut map = JsonMap::new();
                map.insert(
                    "object".to_string(),
                    JsonValue::Number(JsonNumber::from(object.as_u64())),
                );
                map.insert("component".to_string(), JsonValue::String(ty.to_string()));
                JsonValue::Object(map)
            }
        }
    }
}

fn float_map(keys: &[&str], values: &[f32]) -> JsonValue {
    let mut map = JsonMap::new();
    for (key, value) in keys.iter().zip(values) {
        map.insert((*key).to_string(), float_to_json(*value as f64));
    }
    JsonValue::Object(map)
}

fn float_to_json(value: f64) -> JsonValue {
    match JsonNumber::from_f64(value) {
        Some(v) => JsonValue::Number(v),
        None => JsonValue::Null,
    }
}
