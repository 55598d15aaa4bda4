use std::path::Path;

use spendlens_core::analytics::ranking::Order;
use spendlens_core::commands::buckets::BucketsOptions;
use spendlens_core::commands::categories::CategoriesOptions;
use spendlens_core::commands::common::SourceOptions;
use spendlens_core::commands::month::MonthOptions;
use spendlens_core::commands::patterns::{PatternOptions, PatternOverrides};
use spendlens_core::commands::top::TopOptions;
use spendlens_core::commands::{
    buckets, categories, month, patterns, report, summary, top, validate,
};
use spendlens_core::{EngineResult, SuccessEnvelope};
use tracing::debug;

use crate::cli::{Cli, Commands, LedgerArgs, SelectionFlags};

pub fn dispatch(cli: &Cli) -> EngineResult<SuccessEnvelope> {
    dispatch_with_home(cli, None)
}

/// Like [`dispatch`], but reads config from `home` instead of the environment.
pub fn dispatch_with_home(cli: &Cli, home: Option<&Path>) -> EngineResult<SuccessEnvelope> {
    let command = &cli.command;
    let source_for = |ledger: &LedgerArgs| source(ledger, home);
    let patterns_for =
        |ledger: &LedgerArgs, selection: &SelectionFlags, overrides: PatternOverrides| {
            pattern_options(source_for(ledger), selection, overrides)
        };
    debug!(path = ?command.ledger().path, "dispatching command");
    match command {
        Commands::Summary { ledger, selection } => {
            summary::run_with_options(&source_for(ledger), &selection.to_selection())
        }
        Commands::Buckets {
            ledger,
            selection,
            granularity,
            dense,
            rolling_window,
        } => buckets::run_with_options(BucketsOptions {
            source: source_for(ledger),
            selection: selection.to_selection(),
            granularity: *granularity,
            dense: *dense,
            rolling_window: *rolling_window,
        }),
        Commands::Categories {
            ledger,
            selection,
            grid,
        } => categories::run_with_options(CategoriesOptions {
            source: source_for(ledger),
            selection: selection.to_selection(),
            grid: grid.map(Into::into),
        }),
        Commands::Top {
            ledger,
            selection,
            limit,
            ascending,
        } => top::run_with_options(TopOptions {
            source: source_for(ledger),
            selection: selection.to_selection(),
            limit: *limit,
            order: if *ascending {
                Order::Ascending
            } else {
                Order::Descending
            },
        }),
        Commands::Recurring {
            ledger,
            selection,
            threshold,
        } => patterns::recurring(patterns_for(
            ledger,
            selection,
            PatternOverrides {
                threshold: *threshold,
                ..PatternOverrides::default()
            },
        )),
        Commands::Sneaky {
            ledger,
            selection,
            cap,
            floor,
        } => patterns::sneaky(patterns_for(
            ledger,
            selection,
            PatternOverrides {
                threshold: None,
                item_cost_cap: *cap,
                total_floor: *floor,
            },
        )),
        Commands::NewlyRecurring {
            ledger,
            selection,
            threshold,
        } => patterns::newly(patterns_for(
            ledger,
            selection,
            PatternOverrides {
                threshold: *threshold,
                ..PatternOverrides::default()
            },
        )),
        Commands::Large { ledger, selection } => patterns::large(patterns_for(
            ledger,
            selection,
            PatternOverrides::default(),
        )),
        Commands::NoSpend { ledger, selection } => patterns::no_spend(patterns_for(
            ledger,
            selection,
            PatternOverrides::default(),
        )),
        Commands::Month {
            year,
            month,
            ledger,
            selection,
        } => month::run_with_options(MonthOptions {
            source: source_for(ledger),
            selection: selection.to_selection(),
            year: *year,
            month: *month,
        }),
        Commands::Report { ledger, selection } => {
            report::run_with_options(&source_for(ledger), &selection.to_selection())
        }
        Commands::Validate { ledger } => validate::run_with_options(&source_for(ledger)),
    }
}

fn source<'a>(ledger: &LedgerArgs, home: Option<&'a Path>) -> SourceOptions<'a> {
    SourceOptions {
        path: ledger.path.clone(),
        home_override: home,
        ..SourceOptions::default()
    }
}

fn pattern_options<'a>(
    source: SourceOptions<'a>,
    selection: &SelectionFlags,
    overrides: PatternOverrides,
) -> PatternOptions<'a> {
    let mut options = PatternOptions::new(source, selection.to_selection());
    options.overrides = overrides;
    options
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use crate::cli::parse_from;

    use super::dispatch_with_home;

    const LEDGER: &str = "Item,Category,Cost,Date\n\
Coffee,Food & Beverages,4.50,2024-01-05\n\
Coffee,Food & Beverages,4.50,2024-01-20\n\
Game,Gaming,60.00,2024-02-01\n";

    /// Temp dir with an empty config home and the fixture ledger.
    fn sandbox() -> Option<(TempDir, PathBuf, String)> {
        let dir = tempfile::tempdir().ok()?;
        let home = dir.path().join("spendlens-home");
        fs::create_dir_all(&home).ok()?;
        let ledger = dir.path().join("ledger.csv");
        fs::write(&ledger, LEDGER).ok()?;
        let ledger = ledger.display().to_string();
        Some((dir, home, ledger))
    }

    #[test]
    fn dispatches_to_expected_command_names() {
        let sandbox = sandbox();
        assert!(sandbox.is_some());
        if let Some((_dir, home, path)) = sandbox {
            let cases: [(Vec<&str>, &str); 6] = [
                (vec!["spendlens", "summary", &path], "summary"),
                (vec!["spendlens", "buckets", &path], "buckets"),
                (vec!["spendlens", "top", &path, "--ascending"], "top"),
                (vec!["spendlens", "newly-recurring", &path], "newly-recurring"),
                (vec!["spendlens", "no-spend", &path], "no-spend"),
                (vec!["spendlens", "month", "2024", "1", &path], "month"),
            ];

            for (args, expected_command) in cases {
                let parsed = parse_from(args);
                assert!(parsed.is_ok());
                if let Ok(cli) = parsed {
                    let response = dispatch_with_home(&cli, Some(home.as_path()));
                    assert!(response.is_ok());
                    if let Ok(success) = response {
                        assert_eq!(success.command, expected_command);
                    }
                }
            }
        }
    }

    #[test]
    fn threshold_flags_reach_the_engine() {
        let sandbox = sandbox();
        assert!(sandbox.is_some());
        if let Some((_dir, home, path)) = sandbox {
            let parsed = parse_from(["spendlens", "recurring", &path, "--threshold", "1"]);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch_with_home(&cli, Some(home.as_path()));
                assert!(response.is_ok());
                if let Ok(success) = response {
                    assert_eq!(success.data["rows"][0]["item"], "Coffee");
                    assert_eq!(success.data["thresholds"]["count_above"], 1);
                }
            }
        }
    }

    #[test]
    fn config_is_read_from_the_given_home() {
        let sandbox = sandbox();
        assert!(sandbox.is_some());
        if let Some((_dir, home, path)) = sandbox {
            let config = r#"{"patterns": {"recurring_threshold": 1}}"#;
            assert!(fs::write(home.join("config.json"), config).is_ok());

            let parsed = parse_from(["spendlens", "recurring", &path]);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch_with_home(&cli, Some(home.as_path()));
                assert!(response.is_ok());
                if let Ok(success) = response {
                    assert_eq!(success.data["thresholds"]["count_above"], 1);
                    assert_eq!(success.data["rows"][0]["item"], "Coffee");
                }
            }
        }
    }

    #[test]
    fn missing_ledger_is_a_user_error() {
        let sandbox = sandbox();
        assert!(sandbox.is_some());
        if let Some((_dir, home, _path)) = sandbox {
            let parsed = parse_from(["spendlens", "summary", "/no/such/ledger.csv"]);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch_with_home(&cli, Some(home.as_path()));
                assert!(response.is_err());
                if let Err(error) = response {
                    assert_eq!(error.code, "ledger_read_failed");
                }
            }
        }
    }
}
