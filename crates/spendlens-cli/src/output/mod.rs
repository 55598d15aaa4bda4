mod analytics_text;
mod error_text;
mod format;
mod json;
mod mode;

use std::io;

use spendlens_core::{EngineError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &EngineError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    let data = &success.data;
    match success.command.as_str() {
        "summary" => analytics_text::render_summary(data),
        "buckets" => analytics_text::render_buckets(data),
        "categories" => analytics_text::render_categories(data),
        "top" => analytics_text::render_top(data),
        "recurring" | "sneaky" | "newly-recurring" => {
            analytics_text::render_pattern(&success.command, data)
        }
        "large" => analytics_text::render_large(data),
        "no-spend" => analytics_text::render_no_spend(data),
        "month" => analytics_text::render_month(data),
        "report" => analytics_text::render_report(data),
        "validate" => analytics_text::render_validate(data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
