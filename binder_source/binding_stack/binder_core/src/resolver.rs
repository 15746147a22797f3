use binder_variant::{ValueType, Variant};
use log::debug;

use crate::argument::ArgumentSource;
use crate::binding::{CallBinding, ParamSlot};
use crate::error::{DecodeError, ResolutionError};
use crate::literal;
use crate::live::LiveObjectRegistry;

/// Resolve every slot of `binding` against `live`, left to right.
///
/// All or nothing: the first failing slot aborts resolution. The registry is
/// borrowed for the whole call, so every slot reads the same state.
pub fn resolve<L: LiveObjectRegistry + ?Sized>(
    binding: &CallBinding,
    live: &L,
) -> Result<Vec<Variant>, ResolutionError> {
    if binding.method().is_none() {
        return Err(ResolutionError::Unconfigured);
    }

    binding
        .slots()
        .iter()
        .enumerate()
        .map(|(index, slot)| resolve_slot(index, slot, live))
        .collect()
}

fn resolve_slot<L: LiveObjectRegistry + ?Sized>(
    index: usize,
    slot: &ParamSlot,
    live: &L,
) -> Result<Variant, ResolutionError> {
    let value = match &slot.source {
        ArgumentSource::Literal { kind, value } => {
            match literal::decode(*kind, value, &slot.ty) {
                Ok(decoded) => decoded,
                Err(DecodeError::KindMismatch { kind, .. }) => {
                    return Err(mismatch(index, &slot.ty, &format!("{kind} literal")));
                }
                Err(err) => {
                    debug!("slot {index} ({}): {err}; using zero value", slot.name);
                    literal::zero_value(*kind, &slot.ty)
                }
            }
        }

        ArgumentSource::ObjectReference { object } => {
            let found = live
                .lookup(*object)
                .ok_or(ResolutionError::ObjectNotFound {
                    slot: index,
                    object: *object,
                })?;
            Variant::Object(found.id())
        }

        ArgumentSource::ComponentReference { object, component } => {
            let found = live
                .lookup(*object)
                .ok_or(ResolutionError::ObjectNotFound {
                    slot: index,
                    object: *object,
                })?;
            let comp = found
                .component(component)
                .ok_or_else(|| ResolutionError::ComponentNotFound {
                    slot: index,
                    object: *object,
                    component: component.clone(),
                })?;
            Variant::component(found.id(), comp.type_name())
        }

        ArgumentSource::PropertyReference {
            object,
            component,
            property,
        } => {
            let found = live
                .lookup(*object)
                .ok_or(ResolutionError::ObjectNotFound {
                    slot: index,
                    object: *object,
                })?;
            let comp = found
                .component(component)
                .ok_or_else(|| ResolutionError::ComponentNotFound {
                    slot: index,
                    object: *object,
                    component: component.clone(),
                })?;
            let not_found = || ResolutionError::PropertyNotFound {
                slot: index,
                component: component.clone(),
                property: property.clone(),
            };
            let declared = comp.property_type(property).ok_or_else(not_found)?;
            if declared != slot.ty {
                return Err(mismatch(index, &slot.ty, &declared.to_string()));
            }
            comp.property(property).ok_or_else(not_found)?
        }
    };

    if !slot.ty.accepts(&value) {
        return Err(mismatch(index, &slot.ty, value.type_name()));
    }
    Ok(value)
}

fn mismatch(slot: usize, expected: &ValueType, found: &str) -> ResolutionError {
    ResolutionError::TypeMismatch {
        slot,
        expected: expected.to_string(),
        found: found.to_string(),
    }
}
