use ahash::AHashMap;
use log::{debug, warn};

use crate::error::ConfigurationError;
use crate::method::{MemberSignature, MethodSource};

/// Cached member lists per target type.
///
/// Each `refresh` replaces a type's entry wholesale, so a type is either
/// absent or fully up to date.
#[derive(Default, Debug, Clone)]
pub struct MethodRegistry {
    types: AHashMap<String, Vec<MemberSignature>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self {
            types: AHashMap::default(),
        }
    }

    /// Rebuild the member list of `target` from `source`.
    ///
    /// A type that exists but exposes nothing callable is not an error: it is
    /// cached and returned as an empty list.
    pub fn refresh<S: MethodSource + ?Sized>(
        &mut self,
        source: &S,
        target: &str,
    ) -> Result<&[MemberSignature], ConfigurationError> {
        let Some(members) = source.list_callable_members(target) else {
            self.types.remove(target);
            return Err(ConfigurationError::TypeNotFound {
                ty: target.to_string(),
            });
        };

        if members.is_empty() {
            warn!("type `{target}` exposes no callable members");
        } else {
            debug!("registered {} member(s) for `{target}`", members.len());
        }

        let entry = self.types.entry(target.to_string()).or_default();
        *entry = members;
        Ok(entry.as_slice())
    }

    /// Cached members of `target`, if it has been refreshed.
    pub fn members(&self, target: &str) -> Option<&[MemberSignature]> {
        self.types.get(target).map(Vec::as_slice)
    }

    pub fn lookup(&self, target: &str, member: &str) -> Option<&MemberSignature> {
        self.types
            .get(target)?
            .iter()
            .find(|signature| signature.name == member)
    }

    pub fn contains_type(&self, target: &str) -> bool {
        self.types.contains_key(target)
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }
}
