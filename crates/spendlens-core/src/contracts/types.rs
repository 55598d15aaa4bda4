use serde::Serialize;

use crate::ledger::{CoercionWarning, NormalizeSummary};

#[derive(Debug, Clone, Serialize)]
pub struct DataRangeHint {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerInfo {
    pub source_kind: String,
    pub source_ref: Option<String>,
    pub summary: NormalizeSummary,
    pub warning_count: i64,
    pub data_range_hint: DataRangeHint,
}

/// Window and filters actually applied, echoed back with every result.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionInfo {
    pub window: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub categories: Vec<String>,
    /// Query as applied; `None` when absent or below the minimum length.
    pub search: Option<String>,
    pub rows_selected: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub item: String,
    pub category: String,
    pub cost: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsData {
    pub total: f64,
    pub count: i64,
    pub mean: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub stddev: f64,
    pub avg_weekly: f64,
    pub avg_monthly: f64,
    pub avg_yearly: f64,
    pub volatility: f64,
    pub active_weeks: i64,
    pub active_months: i64,
    pub active_years: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub ledger: LedgerInfo,
    pub selection: SelectionInfo,
    pub stats: StatsData,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketRow {
    pub start: String,
    pub label: String,
    pub total: f64,
    pub count: i64,
    pub rolling_average: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketsData {
    pub ledger: LedgerInfo,
    pub selection: SelectionInfo,
    pub granularity: String,
    pub dense: bool,
    pub week_start: String,
    pub rolling_window: i64,
    pub active_buckets: i64,
    pub rows: Vec<BucketRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub total: f64,
    pub count: i64,
    pub mean: f64,
    pub share: f64,
    pub top_item: String,
    pub top_item_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRowData {
    pub start: String,
    pub label: String,
    pub cells: Vec<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGridData {
    pub granularity: String,
    pub categories: Vec<String>,
    pub rows: Vec<GridRowData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesData {
    pub ledger: LedgerInfo,
    pub selection: SelectionInfo,
    pub rows: Vec<CategoryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<CategoryGridData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopData {
    pub ledger: LedgerInfo,
    pub selection: SelectionInfo,
    pub order: String,
    pub limit: i64,
    pub rows: Vec<TransactionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TallyRow {
    pub item: String,
    pub count: i64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternThresholds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_above: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_cost_below: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_above: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternData {
    pub ledger: LedgerInfo,
    pub selection: SelectionInfo,
    pub policy_version: String,
    pub thresholds: PatternThresholds,
    pub rows: Vec<TallyRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LargePurchasesData {
    pub ledger: LedgerInfo,
    pub selection: SelectionInfo,
    pub policy_version: String,
    pub threshold: f64,
    pub rows: Vec<TransactionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoSpendData {
    pub ledger: LedgerInfo,
    pub selection: SelectionInfo,
    pub canonical_categories: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthData {
    pub ledger: LedgerInfo,
    pub selection: SelectionInfo,
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub total: f64,
    pub rows: Vec<TransactionRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuartileRow {
    pub quartile: String,
    pub upper: Option<f64>,
    pub count: i64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub ledger: LedgerInfo,
    pub selection: SelectionInfo,
    pub policy_version: String,
    pub available_years: Vec<i32>,
    pub stats: StatsData,
    pub monthly: Vec<BucketRow>,
    pub categories: Vec<CategoryRow>,
    pub top_items: Vec<TransactionRow>,
    pub bottom_items: Vec<TransactionRow>,
    pub recurring: Vec<TallyRow>,
    pub sneaky: Vec<TallyRow>,
    pub newly_recurring: Vec<TallyRow>,
    pub large_purchases: Vec<TransactionRow>,
    pub no_spend_categories: Vec<String>,
    pub quartiles: Vec<QuartileRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateData {
    pub ledger: LedgerInfo,
    pub valid: bool,
    pub diagnostics: Vec<CoercionWarning>,
}
