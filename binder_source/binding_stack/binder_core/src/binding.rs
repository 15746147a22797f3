use binder_variant::ValueType;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::argument::ArgumentSource;
use crate::error::ConfigurationError;
use crate::literal::LiteralKind;
use crate::method::MemberSignature;
use crate::registry::MethodRegistry;

/// One parameter of the bound method together with where its value comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSlot {
    pub name: String,
    pub ty: ValueType,
    #[serde(flatten)]
    pub source: ArgumentSource,
}

impl ParamSlot {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        let source = ArgumentSource::default_for(&ty);
        Self {
            name: name.into(),
            ty,
            source,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingState {
    /// No method chosen yet.
    Unconfigured,
    /// Method chosen; arguments not resolved since the last edit.
    Configured,
    /// Arguments resolved for the current attempt.
    Resolved,
    /// The last attempt reached the method and returned.
    Invoked,
}

/// Progress of the current call attempt. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Resolved,
    Invoked,
}

/// A late-bound call: target type, method name and one slot per parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallBinding {
    target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(default)]
    params: Vec<ParamSlot>,
    #[serde(skip)]
    phase: Phase,
}

impl CallBinding {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            method: None,
            params: Vec::new(),
            phase: Phase::Idle,
        }
    }

    /// Skeleton binding for `signature` with default arguments.
    pub fn for_member(target: impl Into<String>, signature: &MemberSignature) -> Self {
        let mut binding = Self::new(target);
        binding.configure(signature);
        binding
    }

    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[inline]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    #[inline]
    pub fn slots(&self) -> &[ParamSlot] {
        &self.params
    }

    #[inline]
    pub fn slot(&self, index: usize) -> Option<&ParamSlot> {
        self.params.get(index)
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn state(&self) -> BindingState {
        match (&self.method, self.phase) {
            (None, _) => BindingState::Unconfigured,
            (Some(_), Phase::Idle) => BindingState::Configured,
            (Some(_), Phase::Resolved) => BindingState::Resolved,
            (Some(_), Phase::Invoked) => BindingState::Invoked,
        }
    }

    /// Point the binding at another type. Any chosen method is dropped.
    pub fn set_target(&mut self, target: impl Into<String>) {
        let target = target.into();
        if target == self.target {
            return;
        }
        self.target = target;
        self.method = None;
        self.params.clear();
        self.phase = Phase::Idle;
    }

    /// Choose the member `member` of this binding's target, as cached in `registry`.
    pub fn bind_member(
        &mut self,
        registry: &MethodRegistry,
        member: &str,
    ) -> Result<(), ConfigurationError> {
        if !registry.contains_type(&self.target) {
            return Err(ConfigurationError::TypeNotFound {
                ty: self.target.clone(),
            });
        }
        let signature = registry.lookup(&self.target, member).ok_or_else(|| {
            ConfigurationError::MethodNotFound {
                ty: self.target.clone(),
                method: member.to_string(),
            }
        })?;
        self.configure(signature);
        Ok(())
    }

    /// Adopt `signature` as the bound method.
    ///
    /// Slots are matched by position: a slot keeps its source whenever that
    /// source can still produce the new parameter type (property references
    /// always can until resolved), otherwise it is reset to the new type's
    /// default. Extra slots are dropped and missing ones padded with defaults.
    pub fn configure(&mut self, signature: &MemberSignature) {
        let old = std::mem::take(&mut self.params);
        let mut old = old.into_iter();

        self.params = signature
            .params
            .iter()
            .map(|param| match old.next() {
                Some(prev) if prev.source.can_produce(&param.ty) => ParamSlot {
                    name: param.name.clone(),
                    ty: param.ty.clone(),
                    source: prev.source,
                },
                _ => ParamSlot::new(param.name.clone(), param.ty.clone()),
            })
            .collect();

        debug!(
            "bound `{}.{}` with {} argument slot(s)",
            self.target,
            signature.name,
            self.params.len()
        );
        self.method = Some(signature.name.clone());
        self.phase = Phase::Idle;
    }

    /// Whether the chosen method still has exactly the parameter types in `signature`.
    pub fn matches_signature(&self, signature: &MemberSignature) -> bool {
        self.method.as_deref() == Some(signature.name.as_str())
            && self.params.len() == signature.params.len()
            && self
                .params
                .iter()
                .zip(&signature.params)
                .all(|(slot, param)| slot.ty == param.ty)
    }

    /// Replace the source of slot `index`.
    pub fn set_argument(
        &mut self,
        index: usize,
        source: ArgumentSource,
    ) -> Result<(), ConfigurationError> {
        if self.method.is_none() {
            return Err(ConfigurationError::NotConfigured);
        }
        let arity = self.params.len();
        let slot = self
            .params
            .get_mut(index)
            .ok_or(ConfigurationError::SlotOutOfRange { index, arity })?;

        if !source.can_produce(&slot.ty) {
            return Err(ConfigurationError::IncompatibleSource {
                index,
                expected: slot.ty.clone(),
                source_kind: source.kind_name(),
            });
        }

        slot.source = source;
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Set slot `index` to a literal of the slot's own kind.
    pub fn set_literal(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), ConfigurationError> {
        let slot = self.params.get(index).ok_or(ConfigurationError::SlotOutOfRange {
            index,
            arity: self.params.len(),
        })?;
        let Some(kind) = LiteralKind::for_type(&slot.ty) else {
            return Err(ConfigurationError::IncompatibleSource {
                index,
                expected: slot.ty.clone(),
                source_kind: "literal",
            });
        };
        self.set_argument(index, ArgumentSource::literal(kind, value))
    }

    pub(crate) fn mark_resolved(&mut self) {
        self.phase = Phase::Resolved;
    }

    pub(crate) fn mark_invoked(&mut self) {
        self.phase = Phase::Invoked;
    }

    pub(crate) fn reset_phase(&mut self) {
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use binder_ids::ObjectID;

    use super::*;
    use crate::method::ParamInfo;

    fn sig(name: &str, params: &[(&str, ValueType)]) -> MemberSignature {
        MemberSignature::new(
            name,
            params
                .iter()
                .map(|(n, ty)| ParamInfo::new(*n, ty.clone()))
                .collect(),
        )
    }

    #[test]
    fn new_binding_is_unconfigured() {
        let binding = CallBinding::new("Events");
        assert_eq!(binding.state(), BindingState::Unconfigured);
        assert_eq!(binding.arity(), 0);
    }

    #[test]
    fn configure_builds_default_slots() {
        let binding = CallBinding::for_member(
            "Events",
            &sig("Spawn", &[("count", ValueType::Int), ("at", ValueType::Vector2)]),
        );
        assert_eq!(binding.state(), BindingState::Configured);
        assert_eq!(binding.method(), Some("Spawn"));
        assert_eq!(binding.slots()[0].source, ArgumentSource::literal(LiteralKind::Int, "0"));
        assert_eq!(
            binding.slots()[1].source,
            ArgumentSource::literal(LiteralKind::Vector2, "0,0")
        );
    }

    #[test]
    fn rebinding_resizes_and_keeps_prefix() {
        let mut binding = CallBinding::for_member(
            "Events",
            &sig("A", &[("a", ValueType::Int), ("b", ValueType::String), ("c", ValueType::Bool)]),
        );
        binding.set_literal(0, "5").unwrap();
        binding.set_literal(1, "hi").unwrap();

        binding.configure(&sig("B", &[("x", ValueType::Int)]));
        assert_eq!(binding.arity(), 1);
        assert_eq!(binding.slots()[0].source, ArgumentSource::literal(LiteralKind::Int, "5"));
        assert_eq!(binding.slots()[0].name, "x");

        binding.configure(&sig(
            "C",
            &[("x", ValueType::Int), ("y", ValueType::String), ("z", ValueType::Float)],
        ));
        assert_eq!(binding.arity(), 3);
        assert_eq!(binding.slots()[0].source, ArgumentSource::literal(LiteralKind::Int, "5"));
        assert_eq!(binding.slots()[1].source, ArgumentSource::literal(LiteralKind::String, ""));
        assert_eq!(binding.slots()[2].source, ArgumentSource::literal(LiteralKind::Float, "0"));
    }

    #[test]
    fn rebinding_resets_slots_whose_type_changed() {
        let mut binding = CallBinding::for_member("Events", &sig("A", &[("a", ValueType::Int)]));
        binding.set_literal(0, "9").unwrap();
        binding.configure(&sig("B", &[("a", ValueType::Bool)]));
        assert_eq!(binding.slots()[0].source, ArgumentSource::literal(LiteralKind::Bool, "false"));
    }

    #[test]
    fn rebinding_keeps_property_reference_across_type_change() {
        let mut binding = CallBinding::for_member("Events", &sig("A", &[("x", ValueType::Int)]));
        let health_ratio = ArgumentSource::property(ObjectID::new(1), "Health", "Ratio");
        binding.set_argument(0, health_ratio.clone()).unwrap();

        binding.configure(&sig("B", &[("x", ValueType::Float)]));
        assert_eq!(binding.slots()[0].source, health_ratio);
        assert_eq!(binding.slots()[0].ty, ValueType::Float);
        assert!(binding.matches_signature(&sig("B", &[("x", ValueType::Float)])));
    }

    #[test]
    fn set_argument_validates() {
        let mut binding = CallBinding::new("Events");
        assert_eq!(
            binding.set_literal(0, "1"),
            Err(ConfigurationError::SlotOutOfRange { index: 0, arity: 0 })
        );
        assert_eq!(
            binding.set_argument(0, ArgumentSource::literal(LiteralKind::Int, "1")),
            Err(ConfigurationError::NotConfigured)
        );

        binding.configure(&sig("A", &[("a", ValueType::Int)]));
        assert_eq!(
            binding.set_argument(1, ArgumentSource::literal(LiteralKind::Int, "1")),
            Err(ConfigurationError::SlotOutOfRange { index: 1, arity: 1 })
        );
        assert!(matches!(
            binding.set_argument(0, ArgumentSource::object(ObjectID::new(1))),
            Err(ConfigurationError::IncompatibleSource { index: 0, .. })
        ));
        assert!(binding
            .set_argument(0, ArgumentSource::property(ObjectID::new(1), "Health", "CurrentHp"))
            .is_ok());
    }

    #[test]
    fn editing_returns_to_configured() {
        let mut binding = CallBinding::for_member("Events", &sig("A", &[("a", ValueType::Int)]));
        binding.mark_resolved();
        assert_eq!(binding.state(), BindingState::Resolved);
        binding.set_literal(0, "3").unwrap();
        assert_eq!(binding.state(), BindingState::Configured);

        binding.mark_invoked();
        binding.configure(&sig("A", &[("a", ValueType::Int)]));
        assert_eq!(binding.state(), BindingState::Configured);
    }

    #[test]
    fn retargeting_drops_method() {
        let mut binding = CallBinding::for_member("Events", &sig("A", &[("a", ValueType::Int)]));
        binding.set_target("Events");
        assert_eq!(binding.state(), BindingState::Configured);
        binding.set_target("Other");
        assert_eq!(binding.state(), BindingState::Unconfigured);
        assert_eq!(binding.arity(), 0);
    }

    #[test]
    fn matches_signature_detects_drift() {
        let a = sig("A", &[("a", ValueType::Int)]);
        let binding = CallBinding::for_member("Events", &a);
        assert!(binding.matches_signature(&a));
        assert!(!binding.matches_signature(&sig("A", &[("a", ValueType::Float)])));
        assert!(!binding.matches_signature(&sig("A", &[])));
    }

    #[test]
    fn persisted_binding_loads_as_configured() {
        let binding = CallBinding::for_member("Events", &sig("SetScore", &[("score", ValueType::Int)]));
        let json = serde_json::to_string(&binding).unwrap();
        let loaded: CallBinding = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, binding);
        assert_eq!(loaded.state(), BindingState::Configured);

        let value = serde_json::to_value(&binding).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "target": "Events",
                "method": "SetScore",
                "params": [
                    { "name": "score", "ty": "Int", "source": "literal", "kind": "Int", "value": "0" }
                ]
            })
        );
    }
}
