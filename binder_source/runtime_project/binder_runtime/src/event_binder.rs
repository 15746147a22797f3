use binder_core::{
    ArgumentSource, BindError, BindingState, CallBinding, ConfigurationError, LiveObjectRegistry,
    MethodRegistry, MethodSource, invoke_binding,
};
use binder_variant::Variant;
use log::warn;

/// A single configurable call, fired on demand.
#[derive(Clone, Debug, PartialEq)]
pub struct EventBinder {
    binding: CallBinding,
}

impl EventBinder {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            binding: CallBinding::new(target),
        }
    }

    pub fn from_binding(binding: CallBinding) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &CallBinding {
        &self.binding
    }

    pub fn into_binding(self) -> CallBinding {
        self.binding
    }

    pub fn state(&self) -> BindingState {
        self.binding.state()
    }

    /// Choose `member` on the binder's target type.
    pub fn configure(
        &mut self,
        registry: &MethodRegistry,
        member: &str,
    ) -> Result<(), ConfigurationError> {
        self.binding.bind_member(registry, member)
    }

    pub fn set_argument(
        &mut self,
        index: usize,
        source: ArgumentSource,
    ) -> Result<(), ConfigurationError> {
        self.binding.set_argument(index, source)
    }

    pub fn set_literal(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), ConfigurationError> {
        self.binding.set_literal(index, value)
    }

    /// Check a stored binding against the current member list.
    ///
    /// A member that disappeared is a configuration error. A member whose
    /// parameters changed is re-bound; slots whose type still matches keep
    /// their source.
    pub fn revalidate(&mut self, registry: &MethodRegistry) -> Result<(), ConfigurationError> {
        let Some(method) = self.binding.method() else {
            return Ok(());
        };
        let target = self.binding.target();
        if !registry.contains_type(target) {
            return Err(ConfigurationError::TypeNotFound {
                ty: target.to_string(),
            });
        }
        let Some(signature) = registry.lookup(target, method) else {
            return Err(ConfigurationError::MethodNotFound {
                ty: target.to_string(),
                method: method.to_string(),
            });
        };
        if !self.binding.matches_signature(signature) {
            warn!("`{target}.{method}` changed its parameters; re-binding");
            self.binding.configure(signature);
        }
        Ok(())
    }

    /// Resolve the arguments against `live` and call the member.
    ///
    /// A failure aborts this call only; the binder stays configured and can
    /// be fired again.
    pub fn fire<L, S>(
        &mut self,
        live: &L,
        registry: &MethodRegistry,
        source: &mut S,
    ) -> Result<Variant, BindError>
    where
        L: LiveObjectRegistry + ?Sized,
        S: MethodSource + ?Sized,
    {
        invoke_binding(&mut self.binding, registry, live, source)
    }
}

#[cfg(test)]
mod tests {
    use binder_core::{ParamInfo, ResolutionError, params};
    use binder_ids::ObjectID;
    use binder_variant::ValueType;

    use super::*;
    use crate::events_collection::EventsCollection;
    use crate::scene::{Component, Scene};

    fn setup() -> (EventsCollection<Vec<i32>>, MethodRegistry) {
        let mut events = EventsCollection::new(Vec::new());
        events.register("Events", "SetScore", params![score: ValueType::Int], |log, args| {
            log.push(args[0].as_i32().unwrap_or(-1));
            Ok(Variant::Null)
        });
        let mut registry = MethodRegistry::new();
        registry.refresh(&events, "Events").unwrap();
        (events, registry)
    }

    #[test]
    fn fire_reads_live_property_each_time() {
        let (mut events, registry) = setup();
        let mut scene = Scene::new();
        let id = scene.spawn("Player").unwrap();
        scene
            .get_mut(id)
            .unwrap()
            .add_component(Component::new("Health").with("CurrentHp", ValueType::Int, 80));

        let mut binder = EventBinder::new("Events");
        binder.configure(&registry, "SetScore").unwrap();
        binder
            .set_argument(0, ArgumentSource::property(id, "Health", "CurrentHp"))
            .unwrap();

        binder.fire(&scene, &registry, &mut events).unwrap();
        scene
            .get_mut(id)
            .and_then(|o| o.get_component_mut("Health"))
            .unwrap()
            .set("CurrentHp", 15)
            .unwrap();
        binder.fire(&scene, &registry, &mut events).unwrap();

        assert_eq!(events.state(), &vec![80, 15]);
        assert_eq!(binder.state(), BindingState::Invoked);
    }

    #[test]
    fn failed_fire_can_be_retried() {
        let (mut events, registry) = setup();
        let mut scene = Scene::new();
        let mut binder = EventBinder::new("Events");
        binder.configure(&registry, "SetScore").unwrap();
        binder
            .set_argument(0, ArgumentSource::property(ObjectID::new(1), "Health", "CurrentHp"))
            .unwrap();

        let err = binder.fire(&scene, &registry, &mut events).unwrap_err();
        assert!(matches!(
            err,
            BindError::Resolution(ResolutionError::ObjectNotFound { .. })
        ));
        assert_eq!(binder.state(), BindingState::Configured);

        let id = scene.spawn("Player").unwrap();
        scene
            .get_mut(id)
            .unwrap()
            .add_component(Component::new("Health").with("CurrentHp", ValueType::Int, 9));
        binder.fire(&scene, &registry, &mut events).unwrap();
        assert_eq!(events.state(), &vec![9]);
    }

    #[test]
    fn revalidate_rebinds_changed_signature() {
        let (mut events, mut registry) = setup();
        let mut binder = EventBinder::new("Events");
        binder.configure(&registry, "SetScore").unwrap();
        binder.set_literal(0, "7").unwrap();

        events.register(
            "Events",
            "SetScore",
            vec![
                ParamInfo::new("score", ValueType::Int),
                ParamInfo::new("bonus", ValueType::Bool),
            ],
            |_, _| Ok(Variant::Null),
        );
        registry.refresh(&events, "Events").unwrap();

        binder.revalidate(&registry).unwrap();
        assert_eq!(binder.binding().arity(), 2);
        assert_eq!(
            binder.binding().slot(0).map(|s| &s.source),
            Some(&ArgumentSource::literal(binder_core::LiteralKind::Int, "7"))
        );
    }

    #[test]
    fn revalidate_reports_removed_member() {
        let (mut events, mut registry) = setup();
        let mut binder = EventBinder::new("Events");
        binder.configure(&registry, "SetScore").unwrap();

        events.unregister("Events", "SetScore");
        registry.refresh(&events, "Events").unwrap();

        assert_eq!(
            binder.revalidate(&registry),
            Err(ConfigurationError::MethodNotFound {
                ty: "Events".into(),
                method: "SetScore".into(),
            })
        );
        assert_eq!(binder.state(), BindingState::Configured);
    }
}
