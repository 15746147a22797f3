pub mod value_type;
pub mod variant;
pub use value_type::*;
pub use variant::*;
