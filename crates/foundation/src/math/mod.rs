pub mod point;
pub mod projection;

pub use point::*;
pub use projection::*;
