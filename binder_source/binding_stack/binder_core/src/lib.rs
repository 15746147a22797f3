//! Late-bound method calls whose arguments are literals or live reads of
//! properties on other objects, resolved just before each call.

pub mod argument;
pub mod binding;
pub mod error;
pub mod inspect;
pub mod invoker;
pub mod literal;
pub mod live;
pub mod method;
pub mod registry;
pub mod resolver;

pub use argument::ArgumentSource;
pub use binding::{BindingState, CallBinding, ParamSlot};
pub use error::{BindError, ConfigurationError, DecodeError, InvocationError, ResolutionError};
pub use invoker::{invoke, invoke_binding};
pub use literal::LiteralKind;
pub use live::{LiveComponent, LiveObject, LiveObjectRegistry};
pub use method::{MemberSignature, MethodSource, ParamInfo};
pub use registry::MethodRegistry;
pub use resolver::resolve;

/// Build a `Vec<ParamInfo>` from `name: type` pairs.
#[macro_export]
macro_rules! params {
    ($($name:ident : $ty:expr),* $(,)?) => {
        vec![$($crate::ParamInfo::new(stringify!($name), $ty)),*]
    };
}

pub mod prelude {
    pub use crate::{
        ArgumentSource, BindError, BindingState, CallBinding, LiteralKind, LiveComponent,
        LiveObject, LiveObjectRegistry, MemberSignature, MethodRegistry, MethodSource, ParamInfo,
        invoke, invoke_binding, params, resolve,
    };
    pub use binder_ids::prelude::ObjectID;
    pub use binder_variant::{EnumType, ValueType, Variant};
}
