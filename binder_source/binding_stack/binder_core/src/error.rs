use binder_ids::ObjectID;
use binder_variant::ValueType;
use thiserror::Error;

use crate::literal::LiteralKind;

/// Problems with how a binding is set up. Reported to whoever edits the
/// binding; the binding keeps its previous configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("type `{ty}` was not found in the method source")]
    TypeNotFound { ty: String },

    #[error("type `{ty}` has no callable member `{method}`")]
    MethodNotFound { ty: String, method: String },

    #[error("no method has been chosen for this binding")]
    NotConfigured,

    #[error("`{ty}.{method}` no longer has the parameter types this binding was built for")]
    SignatureChanged { ty: String, method: String },

    #[error("argument slot {index} is out of range (method takes {arity})")]
    SlotOutOfRange { index: usize, arity: usize },

    #[error("argument slot {index} expects {expected}, which a {source_kind} source cannot provide")]
    IncompatibleSource {
        index: usize,
        expected: ValueType,
        source_kind: &'static str,
    },
}

/// A literal whose encoding could not be read. Never surfaced past the
/// resolver: the slot falls back to the kind's zero value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("empty {kind} literal")]
    Empty { kind: LiteralKind },

    #[error("malformed {kind} literal {input:?}: {reason}")]
    Malformed {
        kind: LiteralKind,
        input: String,
        reason: String,
    },

    #[error("{input:?} is not a member of enum `{ty}`")]
    UnknownEnumMember { ty: String, input: String },

    #[error("{kind} literal cannot produce a value of type {declared}")]
    KindMismatch {
        kind: LiteralKind,
        declared: ValueType,
    },
}

/// Failure to turn a binding's argument sources into values. The call is
/// not attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("binding has no method selected")]
    Unconfigured,

    #[error("slot {slot}: object {object} not found")]
    ObjectNotFound { slot: usize, object: ObjectID },

    #[error("slot {slot}: object {object} has no component `{component}`")]
    ComponentNotFound {
        slot: usize,
        object: ObjectID,
        component: String,
    },

    #[error("slot {slot}: component `{component}` has no property `{property}`")]
    PropertyNotFound {
        slot: usize,
        component: String,
        property: String,
    },

    #[error("slot {slot}: expected {expected}, found {found}")]
    TypeMismatch {
        slot: usize,
        expected: String,
        found: String,
    },
}

/// Failure while performing the call itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("`{ty}.{method}` is not a registered member")]
    UnknownMember { ty: String, method: String },

    #[error("`{method}` takes {expected} argument(s), got {found}")]
    ArityMismatch {
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("`{method}` argument {index} expects {expected}, got {found}")]
    ArgumentType {
        method: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("`{method}` failed: {cause}")]
    Fault { method: String, cause: String },
}

/// Any failure of a single configured call attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),
}
