pub mod error;
pub mod hover;
pub mod panel;
pub mod pointer;
pub mod selection;
pub mod surface;
pub mod world;

pub use error::*;
pub use hover::*;
pub use panel::*;
pub use pointer::*;
pub use selection::*;
pub use surface::*;
pub use world::*;
