pub mod color;
pub mod vector2;
pub mod vector3;
pub mod vector4;

pub use color::Color;
pub use vector2::Vector2;
pub use vector3::Vector3;
pub use vector4::Vector4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_ops() {
        assert_eq!(Vector2::new(1.0, 2.0) + Vector2::one(), Vector2::new(2.0, 3.0));
        assert_eq!(Vector3::new(1.0, 2.0, 3.0) - Vector3::one(), Vector3::new(0.0, 1.0, 2.0));
        assert_eq!(Vector4::new(1.0, 1.0, 1.0, 1.0) * 2.0, Vector4::new(2.0, 2.0, 2.0, 2.0));
        assert_eq!(Vector3::new(3.0, 4.0, 0.0).length(), 5.0);
    }

    #[test]
    fn vector_array_conversions() {
        assert_eq!(Vector2::from_array([1.0, 2.0]).to_array(), [1.0, 2.0]);
        assert_eq!(Vector4::from_array([1.0, 2.0, 3.0, 4.0]).w, 4.0);
    }

    #[test]
    fn color_from_hex() {
        assert_eq!(Color::from_hex("#ffffff"), Ok(Color::rgb(1.0, 1.0, 1.0)));
        assert_eq!(Color::from_hex("00000000"), Ok(Color::clear()));
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }
}
