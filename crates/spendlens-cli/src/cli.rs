use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use spendlens_core::analytics::date::Granularity;
use spendlens_core::commands::categories::GridKind;
use spendlens_core::commands::common::SelectionArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    let shaped = value.len() == 10
        && value.char_indices().all(|(index, ch)| match index {
            4 | 7 => ch == '-',
            _ => ch.is_ascii_digit(),
        });
    if !shaped {
        return Err("date must use YYYY-MM-DD format".to_string());
    }
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }
    Ok(IsoDate(value.to_string()))
}

pub fn parse_granularity(value: &str) -> Result<Granularity, String> {
    Granularity::parse(value)
        .ok_or_else(|| "granularity must be one of: day, week, month, year".to_string())
}

pub fn parse_month(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        _ => Err("month must be a number between 1 and 12".to_string()),
    }
}

/// Extended help shown after `spendlens validate --help`.
pub const LEDGER_AFTER_HELP: &str = "\
Ledger format:
  CSV with a header row, or a JSON array of objects.
  Column names are matched without regard to case or surrounding spaces.

  Item      (required)  what was bought; rows without one are dropped
  Category  (required)  blank becomes Miscellaneous
  Cost      (required)  number; $ £ € ¥ and thousands commas are accepted
  Date      (required)  YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY or `7 Jan 2024`;
                        rows with unreadable dates are dropped
  Notes     (optional)  free text, searched by --search

  CSV example:
  Item,Category,Cost,Date,Notes
  Coffee,Food & Beverages,4.50,2024-01-05,oat milk
  Game,Gaming,60.00,2024-02-01,launch sale

  <path> is a local file path. Use `-` (or omit it) to read stdin.
  Example: cat purchases.csv | spendlens summary -
";

#[derive(Debug, Parser)]
#[command(
    name = "spendlens",
    version,
    about = "spending analysis for personal purchase ledgers",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Log engine activity to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct LedgerArgs {
    /// Ledger file (CSV or JSON array); `-` or omitted reads stdin
    pub path: Option<String>,
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SelectionFlags {
    /// Restrict to one calendar year
    #[arg(long)]
    pub year: Option<i32>,
    /// Restrict to the twelve months ending with the latest purchase
    #[arg(long = "last-12-months")]
    pub last_12_months: bool,
    /// Start date filter (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub from: Option<IsoDate>,
    /// End date filter (YYYY-MM-DD)
    #[arg(long, value_parser = parse_iso_date)]
    pub to: Option<IsoDate>,
    /// Smallest cost to include
    #[arg(long)]
    pub min_cost: Option<f64>,
    /// Largest cost to include
    #[arg(long)]
    pub max_cost: Option<f64>,
    /// Keep only this category (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,
    /// Case-insensitive text match on item or notes (2+ characters)
    #[arg(long)]
    pub search: Option<String>,
}

impl SelectionFlags {
    pub fn to_selection(&self) -> SelectionArgs {
        SelectionArgs {
            year: self.year,
            last_12_months: self.last_12_months,
            from: self.from.as_ref().map(|value| value.as_str().to_string()),
            to: self.to.as_ref().map(|value| value.as_str().to_string()),
            min_cost: self.min_cost,
            max_cost: self.max_cost,
            categories: self.categories.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GridArg {
    Month,
    Year,
}

impl From<GridArg> for GridKind {
    fn from(value: GridArg) -> Self {
        match value {
            GridArg::Month => GridKind::Month,
            GridArg::Year => GridKind::Year,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Totals, percentiles and per-period averages
    Summary {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
    },
    /// Spending per day, week, month or year
    Buckets {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
        /// Bucket size: day, week, month or year
        #[arg(long, value_parser = parse_granularity, default_value = "month")]
        granularity: Granularity,
        /// Zero-fill every period between the first and last purchase
        #[arg(long)]
        dense: bool,
        /// Periods in the rolling average (defaults to config)
        #[arg(long)]
        rolling_window: Option<usize>,
    },
    /// Totals per category, optionally as a period grid
    Categories {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
        /// Add a category-by-period grid
        #[arg(long, value_enum)]
        grid: Option<GridArg>,
    },
    /// Most (or least) expensive distinct items
    Top {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
        /// Number of items (defaults to config)
        #[arg(long)]
        limit: Option<usize>,
        /// Cheapest first
        #[arg(long)]
        ascending: bool,
    },
    /// Items bought more often than a threshold
    Recurring {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
        /// Minimum purchase count, exclusive (defaults to config)
        #[arg(long)]
        threshold: Option<usize>,
    },
    /// Small purchases that add up
    Sneaky {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
        /// Only count purchases cheaper than this
        #[arg(long)]
        cap: Option<f64>,
        /// Only report items whose total exceeds this
        #[arg(long)]
        floor: Option<f64>,
    },
    /// Items that started recurring in the second half of the year
    NewlyRecurring {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
        /// Minimum second-half purchase count, exclusive (defaults to config)
        #[arg(long)]
        threshold: Option<usize>,
    },
    /// One-off purchases more than a standard deviation above the mean
    Large {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
    },
    /// Configured categories with no purchases in the selection
    NoSpend {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
    },
    /// Every purchase in one calendar month
    Month {
        /// Calendar year, e.g. 2024
        #[arg(id = "month_year", value_name = "YEAR")]
        year: i32,
        /// Month number, 1-12
        #[arg(value_parser = parse_month)]
        month: u32,
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
    },
    /// Every analysis for the selection in one result
    Report {
        #[command(flatten)]
        ledger: LedgerArgs,
        #[command(flatten)]
        selection: SelectionFlags,
    },
    /// Check a ledger and list every coerced or dropped value
    #[command(after_long_help = LEDGER_AFTER_HELP)]
    Validate {
        #[command(flatten)]
        ledger: LedgerArgs,
    },
}

impl Commands {
    pub fn ledger(&self) -> &LedgerArgs {
        match self {
            Self::Summary { ledger, .. }
            | Self::Buckets { ledger, .. }
            | Self::Categories { ledger, .. }
            | Self::Top { ledger, .. }
            | Self::Recurring { ledger, .. }
            | Self::Sneaky { ledger, .. }
            | Self::NewlyRecurring { ledger, .. }
            | Self::Large { ledger, .. }
            | Self::NoSpend { ledger, .. }
            | Self::Month { ledger, .. }
            | Self::Report { ledger, .. }
            | Self::Validate { ledger } => ledger,
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use spendlens_core::analytics::date::Granularity;

    use super::{Commands, GridArg, parse_from, parse_iso_date};

    #[test]
    fn parse_command_paths() {
        let cases: [Vec<&str>; 16] = [
            vec!["spendlens", "summary", "ledger.csv"],
            vec!["spendlens", "summary", "-", "--json"],
            vec!["spendlens", "summary"],
            vec!["spendlens", "buckets", "ledger.csv", "--granularity", "week", "--dense"],
            vec!["spendlens", "buckets", "ledger.csv", "--rolling-window", "6"],
            vec!["spendlens", "categories", "ledger.csv", "--grid", "year"],
            vec!["spendlens", "top", "ledger.csv", "--limit", "5", "--ascending"],
            vec!["spendlens", "recurring", "ledger.csv", "--threshold", "2"],
            vec!["spendlens", "sneaky", "ledger.csv", "--cap", "5", "--floor", "20"],
            vec!["spendlens", "newly-recurring", "ledger.csv"],
            vec!["spendlens", "large", "ledger.csv", "--year", "2024"],
            vec!["spendlens", "no-spend", "ledger.csv", "--last-12-months"],
            vec!["spendlens", "month", "2024", "3", "ledger.csv"],
            vec![
                "spendlens",
                "report",
                "ledger.csv",
                "--category",
                "Gaming",
                "--category",
                "Books",
            ],
            vec!["spendlens", "validate", "ledger.csv", "--json"],
            vec![
                "spendlens",
                "-v",
                "summary",
                "ledger.csv",
                "--from",
                "2024-01-01",
                "--to",
                "2024-06-30",
            ],
        ];

        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
        }
    }

    #[test]
    fn selection_flags_map_onto_selection_args() {
        let parsed = parse_from([
            "spendlens",
            "summary",
            "ledger.csv",
            "--year",
            "2024",
            "--min-cost",
            "5",
            "--category",
            "Gaming",
            "--search",
            "sale",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed
            && let Commands::Summary { ledger, selection } = cli.command
        {
            assert_eq!(ledger.path.as_deref(), Some("ledger.csv"));
            let args = selection.to_selection();
            assert_eq!(args.year, Some(2024));
            assert_eq!(args.min_cost, Some(5.0));
            assert_eq!(args.categories, vec!["Gaming".to_string()]);
            assert_eq!(args.search.as_deref(), Some("sale"));
        }
    }

    #[test]
    fn buckets_default_to_monthly() {
        let parsed = parse_from(["spendlens", "buckets", "ledger.csv"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(
                cli.command,
                Commands::Buckets {
                    granularity: Granularity::Month,
                    dense: false,
                    ..
                }
            ));
        }
    }

    #[test]
    fn month_takes_year_and_month_before_the_path() {
        let parsed = parse_from(["spendlens", "month", "2024", "3", "ledger.csv", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(
                cli.command,
                Commands::Month {
                    year: 2024,
                    month: 3,
                    ..
                }
            ));
            assert!(cli.command.ledger().json);
        }

        assert!(parse_from(["spendlens", "month", "2024", "13", "ledger.csv"]).is_err());
    }

    #[test]
    fn grid_accepts_month_or_year_only() {
        let parsed = parse_from(["spendlens", "categories", "ledger.csv", "--grid", "month"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(
                cli.command,
                Commands::Categories {
                    grid: Some(GridArg::Month),
                    ..
                }
            ));
        }
        assert!(parse_from(["spendlens", "categories", "ledger.csv", "--grid", "week"]).is_err());
    }

    #[test]
    fn invalid_inputs_are_rejected_at_parse_time() {
        for args in [
            ["spendlens", "summary", "ledger.csv", "--from", "2024-02-31"],
            ["spendlens", "summary", "ledger.csv", "--from", "01/02/2024"],
            ["spendlens", "buckets", "ledger.csv", "--granularity", "hourly"],
        ] {
            assert!(parse_from(args).is_err());
        }
        assert!(parse_from(["spendlens", "import"]).is_err());
    }

    #[test]
    fn iso_date_parser_reports_format_and_calendar_errors() {
        assert_eq!(
            parse_iso_date("2024-1-05"),
            Err("date must use YYYY-MM-DD format".to_string())
        );
        assert_eq!(
            parse_iso_date("2023-02-29"),
            Err("date must use valid calendar values".to_string())
        );
        assert!(parse_iso_date("2024-02-29").is_ok());
    }
}
