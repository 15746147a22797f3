//! Type-safe generational identifiers for live objects and bound members.
//! Object IDs use u64 = index (low 32 bits) | generation (high 32 bits). Index 0 = nil.
//! IDs are created by their owning arena; slot reuse bumps generation so stale IDs are invalid.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---- Generational ID: base encoding ----
// u64 layout: low 32 = index (0 = nil, 1.. = slot), high 32 = generation.

macro_rules! define_generational_id {
    ($type_name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $type_name(pub u64);

        impl $type_name {
            #[inline]
            pub const fn new(id: u32) -> Self {
                Self::from_parts(id, 0)
            }

            #[inline]
            pub const fn nil() -> Self {
                Self(0)
            }

            #[inline]
            pub const fn index(self) -> u32 {
                (self.0 & 0xFFFF_FFFF) as u32
            }

            #[inline]
            pub const fn generation(self) -> u32 {
                (self.0 >> 32) as u32
            }

            #[inline]
            pub const fn from_parts(index: u32, generation: u32) -> Self {
                Self((index as u64) | ((generation as u64) << 32))
            }

            #[inline]
            pub const fn as_u64(self) -> u64 {
                self.0
            }

            #[inline]
            pub const fn from_u64(value: u64) -> Self {
                Self(value)
            }

            #[inline]
            pub const fn is_nil(self) -> bool {
                self.0 == 0
            }

            /// Parse `index:generation` or a bare index (generation 0).
            pub fn parse_str(s: &str) -> Result<Self, String> {
                let s = s.trim();
                let (index, generation) = match s.split_once(':') {
                    Some((i, g)) => (i, g),
                    None => (s, "0"),
                };
                let index = index.trim().parse::<u32>().map_err(|e| {
                    format!(concat!("Invalid ", stringify!($type_name), " index: {}"), e)
                })?;
                let generation = generation.trim().parse::<u32>().map_err(|e| {
                    format!(concat!("Invalid ", stringify!($type_name), " generation: {}"), e)
                })?;
                Ok(Self::from_parts(index, generation))
            }
        }

        impl Default for $type_name {
            fn default() -> Self {
                Self::nil()
            }
        }

        impl fmt::Debug for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($type_name), "({}:{})"),
                    self.index(),
                    self.generation()
                )
            }
        }

        impl fmt::Display for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", self.index(), self.generation())
            }
        }

        // Persisted as the packed u64 so stored bindings stay compact.
        impl Serialize for $type_name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u64(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $type_name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                u64::deserialize(deserializer).map(Self::from_u64)
            }
        }
    };
}

define_generational_id!(
    ObjectID,
    "Live object ID, allocated by ObjectArena. Index + generation."
);
define_generational_id!(
    BinderID,
    "Event binder ID, allocated by SignalHub on connect."
);

