//! Output formatting

use crate::engine::executor::ExecutionResult;
use crate::error::Result;
use crate::output::human::format_human;
use crate::output::json::{format_json, JsonOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

pub fn format_output(result: &ExecutionResult, format: &OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(format_human(result)),
        OutputFormat::Json => format_json(result, JsonOptions { pretty }),
    }
}
