//! In-memory scene used as the live object registry.

use ahash::AHashMap;
use binder_core::literal::{self, LiteralKind};
use binder_core::{DecodeError, LiveComponent, LiveObject, LiveObjectRegistry};
use binder_ids::ObjectID;
use binder_variant::{ValueType, Variant};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::object_arena::ObjectArena;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid scene file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate object name `{0}`")]
    DuplicateName(String),
    #[error("object `{0}` not found")]
    UnknownObject(String),
    #[error("object `{object}` has no component `{component}`")]
    UnknownComponent { object: String, component: String },
    #[error("`{object}.{component}.{property}`: {source}")]
    Decode {
        object: String,
        component: String,
        property: String,
        #[source]
        source: DecodeError,
    },
    #[error("`{component}.{property}` is declared {expected}, got {found}")]
    PropertyType {
        component: String,
        property: String,
        expected: ValueType,
        found: String,
    },
    #[error("`{component}` has no property `{property}`")]
    UnknownProperty { component: String, property: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: ValueType,
    pub value: Variant,
}

/// A typed property bag attached to an object.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    type_name: String,
    properties: Vec<Property>,
}

impl Component {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
        }
    }

    /// Declare a property. `value` must already be of type `ty`.
    pub fn with(mut self, name: impl Into<String>, ty: ValueType, value: impl Into<Variant>) -> Self {
        let name = name.into();
        let value = value.into();
        debug_assert!(ty.accepts(&value), "`{name}` initial value is not {ty}");
        self.properties.retain(|p| p.name != name);
        self.properties.push(Property { name, ty, value });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Overwrite a declared property, keeping its declared type.
    pub fn set(&mut self, name: &str, value: impl Into<Variant>) -> Result<(), SceneError> {
        let value = value.into();
        let Some(prop) = self.properties.iter_mut().find(|p| p.name == name) else {
            return Err(SceneError::UnknownProperty {
                component: self.type_name.clone(),
                property: name.to_string(),
            });
        };
        if !prop.ty.accepts(&value) {
            return Err(SceneError::PropertyType {
                component: self.type_name.clone(),
                property: name.to_string(),
                expected: prop.ty.clone(),
                found: value.type_name().to_string(),
            });
        }
        prop.value = value;
        Ok(())
    }
}

impl LiveComponent for Component {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn property(&self, name: &str) -> Option<Variant> {
        self.get(name).map(|p| p.value.clone())
    }

    fn properties(&self) -> Vec<(&str, ValueType)> {
        self.properties
            .iter()
            .map(|p| (p.name.as_str(), p.ty.clone()))
            .collect()
    }

    fn property_type(&self, name: &str) -> Option<ValueType> {
        self.get(name).map(|p| p.ty.clone())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    id: ObjectID,
    name: String,
    components: Vec<Component>,
}

impl SceneObject {
    pub fn new(id: ObjectID, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            components: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach `component`, replacing any component of the same type.
    pub fn add_component(&mut self, component: Component) {
        self.components.retain(|c| c.type_name != component.type_name);
        self.components.push(component);
    }

    pub fn remove_component(&mut self, type_name: &str) -> Option<Component> {
        let index = self.components.iter().position(|c| c.type_name == type_name)?;
        Some(self.components.remove(index))
    }

    pub fn get_component(&self, type_name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.type_name == type_name)
    }

    pub fn get_component_mut(&mut self, type_name: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.type_name == type_name)
    }
}

impl LiveObject for SceneObject {
    fn id(&self) -> ObjectID {
        self.id
    }

    fn component(&self, type_name: &str) -> Option<&dyn LiveComponent> {
        self.get_component(type_name).map(|c| c as &dyn LiveComponent)
    }

    fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.type_name.as_str()).collect()
    }
}

/// Named objects in an [`ObjectArena`].
#[derive(Default)]
pub struct Scene {
    objects: ObjectArena,
    names: AHashMap<String, ObjectID>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: impl Into<String>) -> Result<ObjectID, SceneError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(SceneError::DuplicateName(name));
        }
        let id = self
            .objects
            .insert_with(|id| SceneObject::new(id, name.clone()));
        debug!("spawned `{name}` as {id}");
        self.names.insert(name, id);
        Ok(id)
    }

    pub fn despawn(&mut self, id: ObjectID) -> Option<SceneObject> {
        let removed = self.objects.remove(id)?;
        self.names.remove(&removed.name);
        Some(removed)
    }

    pub fn find(&self, name: &str) -> Option<ObjectID> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: ObjectID) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: ObjectID) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Build a scene from its JSON description.
    ///
    /// Objects get IDs in file order starting at index 1. Property values
    /// are literal encodings; `Object` and component-typed properties name
    /// another object in the same file.
    pub fn from_json(source: &str) -> Result<Self, SceneError> {
        let file: SceneFile = serde_json::from_str(source)?;
        let mut scene = Scene::new();

        let ids = file
            .objects
            .iter()
            .map(|object| scene.spawn(object.name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        // Component handles may point at objects later in the file.
        let attached: AHashMap<String, Vec<String>> = file
            .objects
            .iter()
            .map(|object| {
                let types = object.components.iter().map(|c| c.ty.clone()).collect();
                (object.name.clone(), types)
            })
            .collect();

        for (object, id) in file.objects.into_iter().zip(ids) {
            let mut components = Vec::with_capacity(object.components.len());
            for component in object.components {
                let mut built = Component::new(component.ty.as_str());
                for prop in component.properties {
                    let value = scene
                        .decode_property(&prop, &attached)
                        .map_err(|err| err.at(&object.name, &component.ty, &prop.name))?;
                    built = built.with(prop.name, prop.ty, value);
                }
                components.push(built);
            }
            if let Some(target) = scene.get_mut(id) {
                components.into_iter().for_each(|c| target.add_component(c));
            }
        }

        Ok(scene)
    }

    fn decode_property(
        &self,
        prop: &PropertyFile,
        attached: &AHashMap<String, Vec<String>>,
    ) -> Result<Variant, PropertyFault> {
        match &prop.ty {
            ValueType::Object => self
                .find(&prop.value)
                .map(Variant::Object)
                .ok_or_else(|| PropertyFault::Object(prop.value.clone())),
            ValueType::Component(ty) => {
                let id = self
                    .find(&prop.value)
                    .ok_or_else(|| PropertyFault::Object(prop.value.clone()))?;
                let has_component = attached
                    .get(&prop.value)
                    .is_some_and(|types| types.iter().any(|t| t.as_str() == &**ty));
                if !has_component {
                    return Err(PropertyFault::Component {
                        object: prop.value.clone(),
                        component: ty.to_string(),
                    });
                }
                Ok(Variant::component(id, &**ty))
            }
            ty => {
                let Some(kind) = LiteralKind::for_type(ty) else {
                    return Err(PropertyFault::Object(prop.value.clone()));
                };
                literal::decode(kind, &prop.value, ty).map_err(PropertyFault::Decode)
            }
        }
    }
}

impl LiveObjectRegistry for Scene {
    fn lookup(&self, id: ObjectID) -> Option<&dyn LiveObject> {
        self.objects.get(id).map(|o| o as &dyn LiveObject)
    }
}

enum PropertyFault {
    Object(String),
    Component { object: String, component: String },
    Decode(DecodeError),
}

impl PropertyFault {
    fn at(self, object: &str, component: &str, property: &str) -> SceneError {
        match self {
            PropertyFault::Object(name) => SceneError::UnknownObject(name),
            PropertyFault::Component { object, component } => {
                SceneError::UnknownComponent { object, component }
            }
            PropertyFault::Decode(source) => SceneError::Decode {
                object: object.to_string(),
                component: component.to_string(),
                property: property.to_string(),
                source,
            },
        }
    }
}

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    objects: Vec<ObjectFile>,
}

#[derive(Deserialize)]
struct ObjectFile {
    name: String,
    #[serde(default)]
    components: Vec<ComponentFile>,
}

#[derive(Deserialize)]
struct ComponentFile {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    properties: Vec<PropertyFile>,
}

#[derive(Deserialize)]
struct PropertyFile {
    name: String,
    #[serde(rename = "type")]
    ty: ValueType,
    #[serde(default)]
    value: String,
}
