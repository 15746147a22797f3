use binder_ids::ObjectID;
use binder_variant::{ValueType, Variant};

/// Read-only view of the host's live objects. The binder never owns or mutates it.
pub trait LiveObjectRegistry {
    fn lookup(&self, id: ObjectID) -> Option<&dyn LiveObject>;
}

pub trait LiveObject {
    fn id(&self) -> ObjectID;

    fn component(&self, type_name: &str) -> Option<&dyn LiveComponent>;

    /// Attached component type names, in attachment order.
    fn component_names(&self) -> Vec<&str>;
}

pub trait LiveComponent {
    fn type_name(&self) -> &str;

    fn property(&self, name: &str) -> Option<Variant>;

    /// Readable properties with their declared types.
    fn properties(&self) -> Vec<(&str, ValueType)>;

    fn property_type(&self, name: &str) -> Option<ValueType> {
        self.properties()
            .into_iter()
            .find(|(prop, _)| *prop == name)
            .map(|(_, ty)| ty)
    }
}
