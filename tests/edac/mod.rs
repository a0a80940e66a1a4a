//! Report tool invocation tests.

mod process_test;
