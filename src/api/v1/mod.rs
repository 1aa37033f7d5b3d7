//! V1 API handlers.

mod error;
mod system;
mod todos;


pub use error::*;
pub use system::*;
pub use todos::*;
