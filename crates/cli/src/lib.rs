//! `modelgen`: the command-line Processor for the schema-driven code and
//! migration generator.

pub mod args;
pub mod logging;
pub mod processor;

pub use args::Args;
pub use processor::{run, ExitStatus};
