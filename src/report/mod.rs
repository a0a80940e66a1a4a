//! Parsing and aggregation of `edac-util --report=full` output.

mod aggregate;
mod line;

pub use aggregate::*;
pub use line::*;
