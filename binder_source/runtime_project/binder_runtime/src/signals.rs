use ahash::AHashMap;
use binder_core::{
    BindError, ConfigurationError, LiveObjectRegistry, MethodRegistry, MethodSource,
};
use binder_ids::BinderID;
use binder_variant::Variant;
use log::{debug, warn};

use crate::bindings::BindingEntry;
use crate::event_binder::EventBinder;

struct Connection {
    event: String,
    binder: EventBinder,
}

/// Routes named events to the binders connected to them.
///
/// Binders fire in connection order. Each binder's outcome is reported on
/// its own; one failing binder never stops the others.
#[derive(Default)]
pub struct SignalHub {
    connections: AHashMap<BinderID, Connection>,
    by_event: AHashMap<String, Vec<BinderID>>,
    next_index: u32,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, event: &str, binder: EventBinder) -> BinderID {
        self.next_index += 1;
        let id = BinderID::new(self.next_index);
        self.connections.insert(
            id,
            Connection {
                event: event.to_string(),
                binder,
            },
        );
        self.by_event.entry(event.to_string()).or_default().push(id);
        debug!("connected binder {id} to `{event}`");
        id
    }

    pub fn disconnect(&mut self, id: BinderID) -> Option<EventBinder> {
        let connection = self.connections.remove(&id)?;
        if let Some(ids) = self.by_event.get_mut(&connection.event) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_event.remove(&connection.event);
            }
        }
        Some(connection.binder)
    }

    /// Revalidate stored bindings against `registry` and connect the usable ones.
    ///
    /// Entries naming a type or member that no longer exists are skipped
    /// with a warning and returned alongside the error.
    pub fn connect_entries(
        &mut self,
        entries: Vec<BindingEntry>,
        registry: &MethodRegistry,
    ) -> Vec<(String, Result<BinderID, ConfigurationError>)> {
        entries
            .into_iter()
            .map(|entry| {
                let mut binder = EventBinder::from_binding(entry.binding);
                let outcome = match binder.revalidate(registry) {
                    Ok(()) => Ok(self.connect(&entry.event, binder)),
                    Err(err) => {
                        warn!("skipping binding for `{}`: {err}", entry.event);
                        Err(err)
                    }
                };
                (entry.event, outcome)
            })
            .collect()
    }

    pub fn binder(&self, id: BinderID) -> Option<&EventBinder> {
        self.connections.get(&id).map(|c| &c.binder)
    }

    pub fn binder_mut(&mut self, id: BinderID) -> Option<&mut EventBinder> {
        self.connections.get_mut(&id).map(|c| &mut c.binder)
    }

    /// Binders connected to `event`, in connection order.
    pub fn connected(&self, event: &str) -> &[BinderID] {
        self.by_event
            .get(event)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Fire every binder connected to `event`.
    pub fn emit<L, S>(
        &mut self,
        event: &str,
        live: &L,
        registry: &MethodRegistry,
        source: &mut S,
    ) -> Vec<(BinderID, Result<Variant, BindError>)>
    where
        L: LiveObjectRegistry + ?Sized,
        S: MethodSource + ?Sized,
    {
        let Some(ids) = self.by_event.get(event) else {
            debug!("`{event}` has no connected binders");
            return Vec::new();
        };

        let mut outcomes = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(connection) = self.connections.get_mut(&id) else {
                continue;
            };
            outcomes.push((id, connection.binder.fire(live, registry, source)));
        }
        outcomes
    }
}
