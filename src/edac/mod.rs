//! Invocation of the external `edac-util` reporting tool.

mod process;

pub use process::*;
