use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::analytics::bucket::TimeBucketSeries;
use crate::analytics::category::CategoryTotals;
use crate::analytics::date::{Granularity, build_date_range, format_iso_date};
use crate::analytics::filter::{CostRange, FilterSet};
use crate::analytics::patterns::ItemTally;
use crate::analytics::report::ReportRequest;
use crate::analytics::stats::StatsBundle;
use crate::analytics::trends::{cumulative, rolling_average};
use crate::analytics::types::{Transaction, TransactionSet, month_name};
use crate::analytics::window::Window;
use crate::config::{AnalysisConfig, load_config};
use crate::contracts::types::{
    BucketRow, CategoryRow, DataRangeHint, LedgerInfo, SelectionInfo, StatsData, TallyRow,
    TransactionRow,
};
use crate::ledger::{LoadedLedger, load_ledger};
use crate::{EngineError, EngineResult};

/// Where the ledger and configuration come from.
#[derive(Debug, Default, Clone)]
pub struct SourceOptions<'a> {
    /// File path, `-` for stdin, or `None` to read piped stdin.
    pub path: Option<String>,
    pub stdin_override: Option<String>,
    pub home_override: Option<&'a Path>,
}

impl SourceOptions<'_> {
    pub fn from_path(path: &str) -> Self {
        Self {
            path: Some(path.to_string()),
            ..Self::default()
        }
    }
}

/// Window and filter arguments shared by every analysis command.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectionArgs {
    pub year: Option<i32>,
    pub last_12_months: bool,
    pub from: Option<String>,
    pub to: Option<String>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub categories: Vec<String>,
    pub search: Option<String>,
}

impl SelectionArgs {
    pub fn to_request(&self, command: &str) -> EngineResult<ReportRequest> {
        let window = match (self.year, self.last_12_months) {
            (Some(_), true) => {
                return Err(EngineError::invalid_argument_for_command(
                    "`--year` and `--last-12-months` cannot be combined.",
                    Some(command),
                ));
            }
            (Some(year), false) => Window::Year(year),
            (None, true) => Window::LastTwelveMonths,
            (None, false) => Window::All,
        };

        let dates = build_date_range(self.from.as_deref(), self.to.as_deref(), command)?;

        for (name, value) in [("min-cost", self.min_cost), ("max-cost", self.max_cost)] {
            if value.is_some_and(|cost| !cost.is_finite()) {
                return Err(EngineError::invalid_argument_for_command(
                    &format!("`--{name}` must be a finite number."),
                    Some(command),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min_cost, self.max_cost)
            && min > max
        {
            return Err(EngineError::invalid_argument_for_command(
                "Invalid cost range: `--min-cost` must not exceed `--max-cost`.",
                Some(command),
            ));
        }

        Ok(ReportRequest {
            window,
            filters: FilterSet {
                dates,
                costs: CostRange {
                    min: self.min_cost,
                    max: self.max_cost,
                },
                categories: self
                    .categories
                    .iter()
                    .map(|category| category.trim().to_string())
                    .filter(|category| !category.is_empty())
                    .collect(),
                search: self.search.clone(),
            },
        })
    }
}

/// Loaded ledger plus the selection every command works on.
pub(crate) struct Prepared {
    pub config: AnalysisConfig,
    pub loaded: LoadedLedger,
    pub request: ReportRequest,
    pub selected: TransactionSet,
}

impl Prepared {
    pub fn transactions(&self) -> &TransactionSet {
        &self.loaded.ledger.transactions
    }

    pub fn ledger_info(&self) -> LedgerInfo {
        ledger_info(&self.loaded)
    }

    pub fn selection_info(&self) -> SelectionInfo {
        let filters = &self.request.filters;
        let dates = filters
            .dates
            .intersect(&self.request.window.date_range(self.transactions()));
        SelectionInfo {
            window: self.request.window.label(),
            from: dates.from.as_ref().map(format_iso_date),
            to: dates.to.as_ref().map(format_iso_date),
            min_cost: filters.costs.min,
            max_cost: filters.costs.max,
            categories: filters.categories.iter().cloned().collect(),
            search: filters.effective_search(),
            rows_selected: self.selected.len() as i64,
        }
    }
}

pub(crate) fn prepare(
    source: &SourceOptions<'_>,
    selection: &SelectionArgs,
    command: &str,
) -> EngineResult<Prepared> {
    let request = selection.to_request(command)?;
    let config = load_config(source.home_override)?.config;
    let loaded = load_ledger(
        source.path.as_deref(),
        source.stdin_override.clone(),
        &config.normalize_options(),
    )?;
    let selected = request.select(&loaded.ledger.transactions);
    Ok(Prepared {
        config,
        loaded,
        request,
        selected,
    })
}

pub(crate) fn ledger_info(loaded: &LoadedLedger) -> LedgerInfo {
    LedgerInfo {
        source_kind: loaded.source_kind.as_str().to_string(),
        source_ref: loaded.source_ref.clone(),
        summary: loaded.ledger.summary.clone(),
        warning_count: loaded.ledger.diagnostics.len() as i64,
        data_range_hint: data_range_hint(&loaded.ledger.transactions),
    }
}

pub fn data_range_hint(transactions: &TransactionSet) -> DataRangeHint {
    let bounds = transactions.date_bounds();
    DataRangeHint {
        earliest: bounds.as_ref().map(|(earliest, _)| format_iso_date(earliest)),
        latest: bounds.as_ref().map(|(_, latest)| format_iso_date(latest)),
    }
}

pub(crate) fn transaction_row(transaction: &Transaction) -> TransactionRow {
    TransactionRow {
        date: format_iso_date(&transaction.date),
        item: transaction.item.clone(),
        category: transaction.category.clone(),
        cost: transaction.cost,
        notes: transaction.notes.clone(),
    }
}

pub(crate) fn transaction_rows(transactions: &[Transaction]) -> Vec<TransactionRow> {
    transactions.iter().map(transaction_row).collect()
}

pub(crate) fn tally_rows(tallies: &[ItemTally]) -> Vec<TallyRow> {
    tallies
        .iter()
        .map(|tally| TallyRow {
            item: tally.item.clone(),
            count: tally.count as i64,
            total: tally.total,
        })
        .collect()
}

pub(crate) fn stats_data(stats: &StatsBundle) -> StatsData {
    StatsData {
        total: stats.total,
        count: stats.count as i64,
        mean: stats.mean,
        median: stats.median,
        p25: stats.p25,
        p75: stats.p75,
        stddev: stats.stddev,
        avg_weekly: stats.avg_weekly,
        avg_monthly: stats.avg_monthly,
        avg_yearly: stats.avg_yearly,
        volatility: stats.volatility,
        active_weeks: stats.active_weeks as i64,
        active_months: stats.active_months as i64,
        active_years: stats.active_years as i64,
    }
}

pub(crate) fn category_rows(totals: &CategoryTotals) -> Vec<CategoryRow> {
    let grand_total = totals.rows.iter().map(|row| row.total).sum::<f64>();
    totals
        .rows
        .iter()
        .map(|row| CategoryRow {
            category: row.category.clone(),
            total: row.total,
            count: row.count as i64,
            mean: row.mean,
            share: if grand_total == 0.0 {
                0.0
            } else {
                row.total / grand_total
            },
            top_item: row.top_item.clone(),
            top_item_cost: row.top_item_cost,
        })
        .collect()
}

pub(crate) fn bucket_rows(series: &TimeBucketSeries, rolling_window: usize) -> Vec<BucketRow> {
    let rolling = rolling_average(series, rolling_window);
    let running = cumulative(series);
    series
        .buckets
        .iter()
        .zip(rolling.iter().zip(running.iter()))
        .map(|(bucket, (average, total_so_far))| BucketRow {
            start: format_iso_date(&bucket.start),
            label: period_label(series.granularity, bucket.start),
            total: bucket.total,
            count: bucket.count as i64,
            rolling_average: average.value,
            cumulative: total_so_far.value,
        })
        .collect()
}

pub(crate) fn period_label(granularity: Granularity, start: NaiveDate) -> String {
    match granularity {
        Granularity::Day | Granularity::Week => format_iso_date(&start),
        Granularity::Month => format!("{} {}", month_name(start.month()), start.year()),
        Granularity::Year => start.year().to_string(),
    }
}
