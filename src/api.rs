mod core;
mod field;
mod value;

pub use self::core::*;
pub use field::*;
pub use value::*;
