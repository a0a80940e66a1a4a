//! EDAC Monitor - watch memory error counters reported by `edac-util`.

pub mod config;
pub mod edac;
pub mod monitor;
pub mod report;
pub mod sink;
