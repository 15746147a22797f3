use binder_ids::ObjectID;
use binder_variant::ValueType;
use serde::{Deserialize, Serialize};

use crate::literal::{self, LiteralKind};

/// Where one argument of a bound call comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ArgumentSource {
    /// A fixed value in its canonical string encoding.
    Literal { kind: LiteralKind, value: String },

    /// The live object itself.
    #[serde(rename = "object")]
    ObjectReference { object: ObjectID },

    /// A component attached to a live object.
    #[serde(rename = "component")]
    ComponentReference { object: ObjectID, component: String },

    /// Read `property` of `component` on `object` every time the call fires.
    #[serde(rename = "property")]
    PropertyReference {
        object: ObjectID,
        component: String,
        property: String,
    },
}

impl ArgumentSource {
    pub fn literal(kind: LiteralKind, value: impl Into<String>) -> Self {
        ArgumentSource::Literal {
            kind,
            value: value.into(),
        }
    }

    pub fn object(object: ObjectID) -> Self {
        ArgumentSource::ObjectReference { object }
    }

    pub fn component(object: ObjectID, component: impl Into<String>) -> Self {
        ArgumentSource::ComponentReference {
            object,
            component: component.into(),
        }
    }

    pub fn property(
        object: ObjectID,
        component: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        ArgumentSource::PropertyReference {
            object,
            component: component.into(),
            property: property.into(),
        }
    }

    /// Default source for a fresh slot of type `ty`: the zero literal, or a
    /// nil reference for object/component slots.
    pub fn default_for(ty: &ValueType) -> Self {
        match ty {
            ValueType::Object => Self::object(ObjectID::nil()),
            ValueType::Component(name) => Self::component(ObjectID::nil(), &**name),
            _ => match LiteralKind::for_type(ty) {
                Some(kind) => Self::literal(kind, literal::zero_encoding(kind, ty)),
                None => unreachable!("every non-reference type has a literal kind"),
            },
        }
    }

    /// Whether this source can ever yield a value of type `ty`.
    ///
    /// Property references are only checked when resolved, since the
    /// property's type is only known to the live registry.
    pub fn can_produce(&self, ty: &ValueType) -> bool {
        match self {
            ArgumentSource::Literal { kind, .. } => LiteralKind::for_type(ty) == Some(*kind),
            ArgumentSource::ObjectReference { .. } => *ty == ValueType::Object,
            ArgumentSource::ComponentReference { component, .. } => {
                matches!(ty, ValueType::Component(name) if &**name == component.as_str())
            }
            ArgumentSource::PropertyReference { .. } => true,
        }
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            ArgumentSource::Literal { .. } => "literal",
            ArgumentSource::ObjectReference { .. } => "object",
            ArgumentSource::ComponentReference { .. } => "component",
            ArgumentSource::PropertyReference { .. } => "property",
        }
    }
}

#[cfg(test)]
mod tests {
    use binder_variant::EnumType;

    use super::*;

    #[test]
    fn defaults_follow_declared_type() {
        assert_eq!(
            ArgumentSource::default_for(&ValueType::Int),
            ArgumentSource::literal(LiteralKind::Int, "0")
        );
        assert_eq!(
            ArgumentSource::default_for(&ValueType::Bool),
            ArgumentSource::literal(LiteralKind::Bool, "false")
        );
        assert_eq!(
            ArgumentSource::default_for(&ValueType::String),
            ArgumentSource::literal(LiteralKind::String, "")
        );
        assert_eq!(
            ArgumentSource::default_for(&ValueType::Vector3),
            ArgumentSource::literal(LiteralKind::Vector3, "0,0,0")
        );
        assert_eq!(
            ArgumentSource::default_for(&ValueType::Enum(EnumType::new("Team", ["Red", "Blue"]))),
            ArgumentSource::literal(LiteralKind::EnumName, "Red")
        );
        assert_eq!(
            ArgumentSource::default_for(&ValueType::Object),
            ArgumentSource::object(ObjectID::nil())
        );
        assert_eq!(
            ArgumentSource::default_for(&ValueType::component("Health")),
            ArgumentSource::component(ObjectID::nil(), "Health")
        );
    }

    #[test]
    fn can_produce() {
        let lit = ArgumentSource::literal(LiteralKind::Int, "1");
        assert!(lit.can_produce(&ValueType::Int));
        assert!(!lit.can_produce(&ValueType::Float));

        let obj = ArgumentSource::object(ObjectID::new(1));
        assert!(obj.can_produce(&ValueType::Object));
        assert!(!obj.can_produce(&ValueType::Int));

        let comp = ArgumentSource::component(ObjectID::new(1), "Health");
        assert!(comp.can_produce(&ValueType::component("Health")));
        assert!(!comp.can_produce(&ValueType::component("Mana")));

        let prop = ArgumentSource::property(ObjectID::new(1), "Health", "CurrentHp");
        assert!(prop.can_produce(&ValueType::Int));
    }

    #[test]
    fn persisted_layout_is_tagged() {
        let prop = ArgumentSource::property(ObjectID::new(7), "Health", "CurrentHp");
        let value = serde_json::to_value(&prop).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "source": "property",
                "object": 7,
                "component": "Health",
                "property": "CurrentHp",
            })
        );

        let lit: ArgumentSource =
            serde_json::from_str(r#"{"source":"literal","kind":"Int","value":"42"}"#).unwrap();
        assert_eq!(lit, ArgumentSource::literal(LiteralKind::Int, "42"));
    }
}
