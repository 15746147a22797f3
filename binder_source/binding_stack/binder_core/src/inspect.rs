//! Lookups used while configuring a binding, e.g. to fill pickers.

use binder_ids::ObjectID;
use binder_variant::ValueType;

use crate::live::LiveObjectRegistry;

/// Component type names on `object`; empty if the object is gone.
pub fn component_names<L: LiveObjectRegistry + ?Sized>(live: &L, object: ObjectID) -> Vec<String> {
    live.lookup(object)
        .map(|obj| obj.component_names().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Properties of `component` on `object` whose declared type is exactly `ty`.
pub fn matching_properties<L: LiveObjectRegistry + ?Sized>(
    live: &L,
    object: ObjectID,
    component: &str,
    ty: &ValueType,
) -> Vec<String> {
    let Some(comp) = live.lookup(object).and_then(|obj| obj.component(component)) else {
        return Vec::new();
    };
    comp.properties()
        .into_iter()
        .filter(|(_, prop_ty)| prop_ty == ty)
        .map(|(name, _)| name.to_string())
        .collect()
}
