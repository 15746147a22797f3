mod bindings;
mod event_binder;
mod events_collection;
mod object_arena;
mod scene;
mod signals;

pub use bindings::{BindingEntry, load_bindings, save_bindings};
pub use event_binder::EventBinder;
pub use events_collection::{EventsCollection, Handler};
pub use object_arena::ObjectArena;
pub use scene::{Component, Property, Scene, SceneError, SceneObject};
pub use signals::SignalHub;
