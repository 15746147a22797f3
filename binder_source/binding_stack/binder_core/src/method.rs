use binder_variant::{ValueType, Variant};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    pub ty: ValueType,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A callable member as listed by a [`MethodSource`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSignature {
    pub name: String,
    pub params: Vec<ParamInfo>,
}

impl MemberSignature {
    pub fn new(name: impl Into<String>, params: Vec<ParamInfo>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Host-provided table of callable members, grouped by declaring type.
pub trait MethodSource {
    /// Members of `type_name` in declaration order, or `None` if the type is unknown.
    fn list_callable_members(&self, type_name: &str) -> Option<Vec<MemberSignature>>;

    /// Perform the call. Errors are reported back to the caller of the
    /// binding, never treated as fatal.
    fn invoke_member(
        &mut self,
        type_name: &str,
        member: &str,
        args: &[Variant],
    ) -> anyhow::Result<Variant>;
}
