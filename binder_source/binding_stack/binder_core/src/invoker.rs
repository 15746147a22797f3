use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use binder_variant::Variant;
use log::{info, warn};

use crate::binding::CallBinding;
use crate::error::{BindError, ConfigurationError, InvocationError};
use crate::live::LiveObjectRegistry;
use crate::method::MethodSource;
use crate::registry::MethodRegistry;
use crate::resolver::resolve;

/// Call `target.method` with already resolved arguments.
///
/// Errors returned by the member and panics raised inside it are both
/// reported as [`InvocationError::Fault`].
pub fn invoke<S: MethodSource + ?Sized>(
    registry: &MethodRegistry,
    source: &mut S,
    target: &str,
    method: &str,
    args: &[Variant],
) -> Result<Variant, InvocationError> {
    let signature =
        registry
            .lookup(target, method)
            .ok_or_else(|| InvocationError::UnknownMember {
                ty: target.to_string(),
                method: method.to_string(),
            })?;

    if signature.arity() != args.len() {
        return Err(InvocationError::ArityMismatch {
            method: method.to_string(),
            expected: signature.arity(),
            found: args.len(),
        });
    }

    let mismatch = signature
        .params
        .iter()
        .zip(args)
        .enumerate()
        .find(|(_, (param, arg))| !param.ty.accepts(arg));
    if let Some((index, (param, arg))) = mismatch {
        return Err(InvocationError::ArgumentType {
            method: method.to_string(),
            index,
            expected: param.ty.to_string(),
            found: arg.type_name().to_string(),
        });
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        source.invoke_member(target, method, args)
    }));

    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(InvocationError::Fault {
            method: method.to_string(),
            cause: format!("{err:#}"),
        }),
        Err(payload) => Err(InvocationError::Fault {
            method: method.to_string(),
            cause: panic_message(payload.as_ref()),
        }),
    }
}

/// Resolve and invoke `binding` once, advancing its state.
///
/// A binding whose slot types no longer match the registered member is
/// refused before anything is resolved. A failed resolution leaves the
/// binding `Configured`; a failed invocation leaves it `Resolved`. Either way
/// only this attempt is aborted.
pub fn invoke_binding<L, S>(
    binding: &mut CallBinding,
    registry: &MethodRegistry,
    live: &L,
    source: &mut S,
) -> Result<Variant, BindError>
where
    L: LiveObjectRegistry + ?Sized,
    S: MethodSource + ?Sized,
{
    binding.reset_phase();

    let registered = binding
        .method()
        .and_then(|method| registry.lookup(binding.target(), method));
    if let Some(signature) = registered.filter(|sig| !binding.matches_signature(sig)) {
        let err = ConfigurationError::SignatureChanged {
            ty: binding.target().to_string(),
            method: signature.name.clone(),
        };
        warn!("{err}");
        return Err(err.into());
    }

    let args = resolve(binding, live)
        .inspect_err(|err| warn!("`{}`: {err}", binding.target()))?;
    binding.mark_resolved();

    let Some(method) = binding.method() else {
        unreachable!("resolve rejects bindings without a method");
    };

    match invoke(registry, source, binding.target(), method, &args) {
        Ok(value) => {
            info!("invoked `{}.{method}` -> {value}", binding.target());
            binding.mark_invoked();
            Ok(value)
        }
        Err(err) => {
            warn!("{err}");
            Err(err.into())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "member panicked".to_string()
    }
}
