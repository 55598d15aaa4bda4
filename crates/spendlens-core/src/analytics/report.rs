use std::collections::BTreeSet;

use tracing::debug;

use crate::analytics::bucket::{BucketSpan, TimeBucketSeries, bucket, month_details};
use crate::analytics::category::{CategoryTotals, by_category};
use crate::analytics::date::Granularity;
use crate::analytics::filter::{FilterSet, filter};
use crate::analytics::patterns::{
    ItemTally, newly_recurring, no_spend_categories, recurring_items, sneaky_totals,
};
use crate::analytics::ranking::{Order, large_purchases, top_items};
use crate::analytics::stats::{StatsBundle, summarize};
use crate::analytics::trends::{
    QuartileBand, TrendPoint, cumulative, quartile_distribution, rolling_average,
};
use crate::analytics::types::{Transaction, TransactionSet};
use crate::analytics::window::{Window, available_years};
use crate::config::AnalysisConfig;

/// Window plus explicit filters, applied together before any computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRequest {
    pub window: Window,
    pub filters: FilterSet,
}

impl ReportRequest {
    /// Transactions selected by the window and every filter.
    pub fn select(&self, transactions: &TransactionSet) -> TransactionSet {
        let filters = self
            .filters
            .clone()
            .with_dates(self.window.date_range(transactions));
        filter(transactions, &filters)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub window: Window,
    pub available_years: Vec<i32>,
    pub selected: TransactionSet,
    pub stats: StatsBundle,
    pub monthly: TimeBucketSeries,
    pub rolling: Vec<TrendPoint>,
    pub cumulative: Vec<TrendPoint>,
    pub categories: CategoryTotals,
    pub top_items: Vec<Transaction>,
    pub bottom_items: Vec<Transaction>,
    pub recurring: Vec<ItemTally>,
    pub sneaky: Vec<ItemTally>,
    pub newly_recurring: Vec<ItemTally>,
    pub large_purchases: Vec<Transaction>,
    pub no_spend: BTreeSet<String>,
    pub quartiles: [QuartileBand; 4],
}

pub fn analyze(
    transactions: &TransactionSet,
    request: &ReportRequest,
    config: &AnalysisConfig,
) -> AnalysisReport {
    let selected = request.select(transactions);
    let policy = config.patterns;
    let monthly = match request.window {
        Window::Year(year) => bucket(&selected, Granularity::Month, BucketSpan::Year(year)),
        Window::All | Window::LastTwelveMonths => month_details(&selected),
    };

    let report = AnalysisReport {
        window: request.window,
        available_years: available_years(transactions),
        stats: summarize(&selected),
        rolling: rolling_average(&monthly, policy.rolling_window),
        cumulative: cumulative(&monthly),
        categories: by_category(&selected),
        top_items: top_items(&selected, policy.top_n, Order::Descending),
        bottom_items: top_items(&selected, policy.top_n, Order::Ascending),
        recurring: recurring_items(&selected, policy.report_recurring_threshold),
        sneaky: sneaky_totals(&selected, policy.sneaky_item_cap, policy.sneaky_total_floor),
        newly_recurring: newly_recurring(&selected, policy.newly_recurring_threshold),
        large_purchases: large_purchases(&selected),
        no_spend: no_spend_categories(&selected, &config.categories),
        quartiles: quartile_distribution(&selected),
        monthly,
        selected,
    };
    debug!(
        window = %report.window.label(),
        selected = report.selected.len(),
        "built analysis report"
    );
    report
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;

    use super::{ReportRequest, analyze};
    use crate::analytics::filter::FilterSet;
    use crate::analytics::types::{Transaction, TransactionSet};
    use crate::analytics::window::Window;
    use crate::config::AnalysisConfig;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    fn ledger() -> TransactionSet {
        TransactionSet::new(vec![
            Transaction::new("Old book", "Books & Literature", 15.0, date("2023-06-01"), ""),
            Transaction::new("Coffee", "Food & Beverages", 4.5, date("2024-01-05"), ""),
            Transaction::new("Coffee", "Food & Beverages", 4.5, date("2024-01-20"), ""),
            Transaction::new("Game", "Gaming", 60.0, date("2024-02-01"), ""),
        ])
    }

    #[test]
    fn year_window_yields_twelve_months_and_scoped_stats() {
        let request = ReportRequest {
            window: Window::Year(2024),
            filters: FilterSet::default(),
        };
        let report = analyze(&ledger(), &request, &AnalysisConfig::default());
        assert_eq!(report.monthly.len(), 12);
        assert_eq!(report.stats.count, 3);
        assert_eq!(report.stats.total, 69.0);
        assert_eq!(report.available_years, vec![2024, 2023]);
        assert_eq!(report.cumulative.last().map(|point| point.value), Some(69.0));
        assert!(report.no_spend.contains("Books & Literature"));
    }

    #[test]
    fn filters_compose_with_the_window() {
        let request = ReportRequest {
            window: Window::All,
            filters: FilterSet {
                categories: BTreeSet::from(["Gaming".to_string()]),
                ..FilterSet::default()
            },
        };
        let report = analyze(&ledger(), &request, &AnalysisConfig::default());
        assert_eq!(report.stats.total, 60.0);
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.top_items.len(), 1);
    }

    #[test]
    fn empty_ledger_produces_a_zeroed_report() {
        let report = analyze(
            &TransactionSet::empty(),
            &ReportRequest::default(),
            &AnalysisConfig::default(),
        );
        assert_eq!(report.stats.count, 0);
        assert!(report.monthly.is_empty());
        assert!(report.large_purchases.is_empty());
        assert_eq!(report.no_spend.len(), 11);
    }
}
