//! Command-line front end for tsdoc lookups.

pub mod args;
pub mod render;
pub mod report;
pub mod tracing_config;

pub use args::CliArgs;
pub use render::Renderer;
pub use report::{EXIT_FAILURE, EXIT_SUCCESS, OutputFormat, Report, report};
