//! Mapping of a lookup result to process output and exit code.

use crate::render::Renderer;
use anyhow::Context;
use tsdoc_lookup::{LookupError, LookupOutput};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text { color: bool },
    Json,
}

/// Everything the binary prints, and how it exits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl Report {
    fn success(stdout: String) -> Self {
        Report {
            code: EXIT_SUCCESS,
            stdout: Some(stdout),
            stderr: None,
        }
    }

    fn failure(stderr: String) -> Self {
        Report {
            code: EXIT_FAILURE,
            stdout: None,
            stderr: Some(stderr),
        }
    }
}

fn format_output(output: &LookupOutput, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text { color } => Ok(Renderer::new(color).render(output)),
        OutputFormat::Json => serde_json::to_string_pretty(output).context("failed to serialize lookup result"),
    }
}

pub fn report(result: Result<LookupOutput, LookupError>, format: OutputFormat) -> Report {
    match result {
        Ok(output) => match format_output(&output, format) {
            Ok(text) => Report::success(text),
            Err(err) => Report::failure(format!("Error: {err:#}")),
        },
        Err(err @ LookupError::NotFound { .. }) => Report::failure(err.to_string()),
        Err(LookupError::Internal(err)) => Report::failure(format!("Error: {err:#}")),
        Err(err) => Report::failure(format!("Error: {err}")),
    }
}
