pub mod bounds;
pub mod error;
pub mod ids;
pub mod math;
pub mod position;
pub mod region;
pub mod view;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use error::*;
pub use ids::*;
pub use position::*;
pub use region::*;
pub use view::*;
