//! Console and progress helpers shared by the binary and pipelines.

pub mod console;
pub mod progress;
