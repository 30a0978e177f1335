pub mod config;
pub mod error;
pub mod view_state;

pub use config::*;
pub use error::*;
pub use view_state::*;
