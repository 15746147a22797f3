use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Number, Variant};

/// An enum type as seen by a bound method: its name and ordered member names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumType {
    pub name: Arc<str>,
    pub variants: Vec<Arc<str>>,
}

impl EnumType {
    pub fn new<I, S>(name: impl AsRef<str>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: Arc::from(name.as_ref()),
            variants: variants.into_iter().map(|v| Arc::from(v.as_ref())).collect(),
        }
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| &**v == variant)
    }

    pub fn first(&self) -> Option<&str> {
        self.variants.first().map(|v| &**v)
    }
}

/// Declared type of a method parameter or a component property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Double,
    String,
    Vector2,
    Vector3,
    Vector4,
    Color,
    Enum(EnumType),
    Object,
    /// A component of the named type.
    Component(Arc<str>),
}

impl ValueType {
    pub fn component(ty: impl AsRef<str>) -> Self {
        ValueType::Component(Arc::from(ty.as_ref()))
    }

    /// Exact runtime type check. Numbers never widen or narrow.
    pub fn accepts(&self, value: &Variant) -> bool {
        match (self, value) {
            (ValueType::Bool, Variant::Bool(_)) => true,
            (ValueType::Int, Variant::Number(Number::I32(_))) => true,
            (ValueType::Float, Variant::Number(Number::F32(_))) => true,
            (ValueType::Double, Variant::Number(Number::F64(_))) => true,
            (ValueType::String, Variant::String(_)) => true,
            (ValueType::Vector2, Variant::Vector2(_)) => true,
            (ValueType::Vector3, Variant::Vector3(_)) => true,
            (ValueType::Vector4, Variant::Vector4(_)) => true,
            (ValueType::Color, Variant::Color(_)) => true,
            (ValueType::Enum(e), Variant::Enum { ty, name }) => e.name == *ty && e.contains(name),
            (ValueType::Object, Variant::Object(_)) => true,
            (ValueType::Component(expected), Variant::Component { ty, .. }) => expected == ty,
            _ => false,
        }
    }

    #[inline]
    pub const fn is_reference(&self) -> bool {
        matches!(self, ValueType::Object | ValueType::Component(_))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => write!(f, "Bool"),
            ValueType::Int => write!(f, "Int"),
            ValueType::Float => write!(f, "Float"),
            ValueType::Double => write!(f, "Double"),
            ValueType::String => write!(f, "String"),
            ValueType::Vector2 => write!(f, "Vector2"),
            ValueType::Vector3 => write!(f, "Vector3"),
            ValueType::Vector4 => write!(f, "Vector4"),
            ValueType::Color => write!(f, "Color"),
            ValueType::Enum(e) => write!(f, "{}", e.name),
            ValueType::Object => write!(f, "Object"),
            ValueType::Component(ty) => write!(f, "{ty}"),
        }
    }
}
