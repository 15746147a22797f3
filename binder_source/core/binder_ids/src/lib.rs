pub mod ids;

pub use ids::*;

pub mod prelude {
    pub use crate::ids::{BinderID, ObjectID};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_nil() {
        let nil = ObjectID::nil();
        assert!(nil.is_nil());
        assert_eq!(nil.index(), 0);
        assert_eq!(nil.generation(), 0);
        assert_eq!(ObjectID::default(), nil);
    }

    #[test]
    fn object_id_parts() {
        let id = ObjectID::from_parts(5, 2);
        assert_eq!(id.index(), 5);
        assert_eq!(id.generation(), 2);
        assert!(!id.is_nil());
    }

    #[test]
    fn object_id_packing_is_stable() {
        let id = ObjectID::from_parts(u32::MAX, 7);
        assert_eq!(ObjectID::from_u64(id.as_u64()), id);
        assert_eq!(format!("{id}"), format!("{}:7", u32::MAX));
    }

    #[test]
    fn object_id_parse_str() {
        assert_eq!(ObjectID::parse_str("7"), Ok(ObjectID::new(7)));
        assert_eq!(ObjectID::parse_str(" 3:1 "), Ok(ObjectID::from_parts(3, 1)));
        assert!(ObjectID::parse_str("abc").is_err());
        assert!(ObjectID::parse_str("3:x").is_err());
    }

    #[test]
    fn object_id_serializes_as_packed_u64() {
        let id = ObjectID::from_parts(4, 1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.as_u64().to_string());
        let back: ObjectID = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
