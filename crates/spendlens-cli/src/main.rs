mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use spendlens_core::EngineError;
use stdout_io::write_stdout_text;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const ROOT_HELP: &str = "Spendlens - spending analysis for personal purchase ledgers

Usage:
  spendlens <command> <path>

Start here:
  spendlens validate purchases.csv
  spendlens report purchases.csv --year 2024
";

const TOP_LEVEL_HELP: &str = "Spendlens - spending analysis for personal purchase ledgers

USAGE: spendlens <command> [path] [flags]

Check your ledger first:
  spendlens validate <path>                     List coerced and dropped rows
  spendlens validate --help                     Ledger columns and accepted formats

Overview:
  spendlens summary <path>                      Totals, percentiles, per-period averages
  spendlens report <path>                       Every analysis in one result
  spendlens buckets <path> --granularity week   Spending per day/week/month/year
  spendlens categories <path> --grid month      Totals per category
  spendlens month <year> <month> <path>         Every purchase in one month

Patterns:
  spendlens top <path>                          Most expensive distinct items
  spendlens recurring <path>                    Items bought again and again
  spendlens sneaky <path>                       Small purchases that add up
  spendlens newly-recurring <path>              Habits that started mid-year
  spendlens large <path>                        Unusually large one-off purchases
  spendlens no-spend <path>                     Categories with no spending

Selection flags (every analysis command):
  --year <YEAR> | --last-12-months
  --from <YYYY-MM-DD> --to <YYYY-MM-DD>
  --min-cost <N> --max-cost <N> --category <NAME>... --search <TEXT>
  --json                                        Print the result as JSON

Use `-` (or omit the path) to read the ledger from stdin.
Run `spendlens <command> --help` for command usage.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return Err(report_parse_error(&err, &raw_args)),
    };
    init_tracing(cli.verbose);

    let mode = output::mode_for_command(&cli.command);
    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

/// RUST_LOG wins over `--verbose`; logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_parse_error(err: &clap::Error, raw_args: &[String]) -> ExitCode {
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        let text = if is_top_level_help_request(raw_args) {
            TOP_LEVEL_HELP.to_string()
        } else {
            err.to_string()
        };
        if write_stdout_text(&text).is_err() {
            return ExitCode::from(2);
        }
        return ExitCode::SUCCESS;
    }

    let command_hint = command_from_args(raw_args);
    let clean_message = strip_clap_boilerplate(&err.to_string());
    let parse_error =
        EngineError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
    let mode = infer_requested_output_mode(raw_args);
    if output::print_failure(&parse_error, mode).is_err() {
        return ExitCode::from(2);
    }
    ExitCode::from(1)
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing Usage line and "For more information" hint.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// First non-flag argument when it names a known subcommand.
fn command_from_args(raw_args: &[String]) -> Option<String> {
    let first = raw_args
        .iter()
        .skip(1)
        .find(|value| !value.starts_with('-'))?;
    let known = matches!(
        first.as_str(),
        "summary"
            | "buckets"
            | "categories"
            | "top"
            | "recurring"
            | "sneaky"
            | "newly-recurring"
            | "large"
            | "no-spend"
            | "month"
            | "report"
            | "validate"
    );
    known.then(|| first.clone())
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn exit_code_for_error(error: &EngineError) -> ExitCode {
    if error.code.starts_with("internal_") {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::{command_from_args, strip_clap_boilerplate};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_hint_only_names_known_commands() {
        assert_eq!(
            command_from_args(&args(&["spendlens", "--json", "summary", "x.csv"])),
            Some("summary".to_string())
        );
        assert_eq!(command_from_args(&args(&["spendlens", "import"])), None);
    }

    #[test]
    fn clap_usage_tail_is_removed() {
        let message = "error: unexpected argument '--nope' found\n\nUsage: spendlens summary";
        assert_eq!(
            strip_clap_boilerplate(message),
            "error: unexpected argument '--nope' found"
        );
    }
}
