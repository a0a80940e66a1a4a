//! Configuration module.

mod duration;
mod loader;
mod types;

pub use duration::*;
pub use loader::*;
pub use types::*;
