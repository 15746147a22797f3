use std::fmt;

use ahash::AHashMap;
use anyhow::bail;
use binder_core::{MemberSignature, MethodSource, ParamInfo};
use binder_variant::Variant;
use log::debug;

pub type Handler<S> = Box<dyn Fn(&mut S, &[Variant]) -> anyhow::Result<Variant>>;

struct TypeTable<S> {
    // declaration order, as listed to configuration
    members: Vec<MemberSignature>,
    handlers: AHashMap<String, Handler<S>>,
}

impl<S> Default for TypeTable<S> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            handlers: AHashMap::default(),
        }
    }
}

/// Static registration table of callable members over shared state `S`.
///
/// Stands in for runtime reflection: every member a binding may call is
/// registered here with its parameter list and a handler closure.
pub struct EventsCollection<S> {
    state: S,
    types: AHashMap<String, TypeTable<S>>,
}

impl<S> EventsCollection<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            types: AHashMap::default(),
        }
    }

    /// Make `type_name` known even if it exposes no members yet.
    pub fn declare_type(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.types.entry(type_name.into()).or_default();
        self
    }

    /// Register `member` on `type_name`. Registering an existing member
    /// replaces its parameters and handler in place.
    pub fn register<F>(
        &mut self,
        type_name: impl Into<String>,
        member: impl Into<String>,
        params: Vec<ParamInfo>,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&mut S, &[Variant]) -> anyhow::Result<Variant> + 'static,
    {
        let type_name = type_name.into();
        let member = member.into();
        let table = self.types.entry(type_name.clone()).or_default();

        debug!("registered `{type_name}.{member}`");
        table.handlers.insert(member.clone(), Box::new(handler));
        let signature = MemberSignature::new(member, params);
        match table.members.iter_mut().find(|m| m.name == signature.name) {
            Some(existing) => *existing = signature,
            None => table.members.push(signature),
        }
        self
    }

    pub fn unregister(&mut self, type_name: &str, member: &str) -> bool {
        let Some(table) = self.types.get_mut(type_name) else {
            return false;
        };
        table.members.retain(|m| m.name != member);
        table
            .handlers
            .remove(member)
            .is_some()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl<S> MethodSource for EventsCollection<S> {
    fn list_callable_members(&self, type_name: &str) -> Option<Vec<MemberSignature>> {
        self.types.get(type_name).map(|table| table.members.clone())
    }

    fn invoke_member(
        &mut self,
        type_name: &str,
        member: &str,
        args: &[Variant],
    ) -> anyhow::Result<Variant> {
        let handler = self
            .types
            .get(type_name)
            .and_then(|table| table.handlers.get(member));
        let Some(handler) = handler else {
            bail!("`{type_name}` has no handler for `{member}`");
        };
        handler(&mut self.state, args)
    }
}

impl<S: fmt::Debug> fmt::Debug for EventsCollection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventsCollection")
            .field("state", &self.state)
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use binder_core::params;
    use binder_variant::ValueType;

    use super::*;

    fn counter() -> EventsCollection<i32> {
        let mut events = EventsCollection::new(0);
        events
            .register("Events", "Add", params![by: ValueType::Int], |total, args| {
                *total += args[0].as_i32().unwrap_or_default();
                Ok(Variant::from(*total))
            })
            .register("Events", "Reset", params![], |total, _| {
                *total = 0;
                Ok(Variant::Null)
            })
            .declare_type("Idle");
        events
    }

    #[test]
    fn lists_members_in_registration_order() {
        let events = counter();
        let names: Vec<_> = events
            .list_callable_members("Events")
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["Add", "Reset"]);
        assert_eq!(events.list_callable_members("Idle"), Some(Vec::new()));
        assert!(events.list_callable_members("Ghost").is_none());
    }

    #[test]
    fn handlers_mutate_shared_state() {
        let mut events = counter();
        let out = events
            .invoke_member("Events", "Add", &[Variant::from(5)])
            .unwrap();
        assert_eq!(out, Variant::from(5));
        events.invoke_member("Events", "Add", &[Variant::from(2)]).unwrap();
        assert_eq!(*events.state(), 7);
        events.invoke_member("Events", "Reset", &[]).unwrap();
        assert_eq!(events.into_state(), 0);
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let mut events = counter();
        events.register("Events", "Add", params![], |total, _| {
            *total += 100;
            Ok(Variant::Null)
        });
        let members = events.list_callable_members("Events").unwrap();
        assert_eq!(members[0].name, "Add");
        assert_eq!(members[0].arity(), 0);
        events.invoke_member("Events", "Add", &[]).unwrap();
        assert_eq!(*events.state(), 100);
    }

    #[test]
    fn missing_handler_is_an_error() {
        let mut events = counter();
        assert!(events.unregister("Events", "Reset"));
        assert!(events.invoke_member("Events", "Reset", &[]).is_err());
        assert!(events.invoke_member("Ghost", "Add", &[]).is_err());
    }
}
