use tracing::debug;

use crate::analytics::bucket::{BucketSpan, bucket};
use crate::analytics::date::Granularity;
use crate::analytics::types::TransactionSet;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsBundle {
    pub total: f64,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub stddev: f64,
    pub avg_weekly: f64,
    pub avg_monthly: f64,
    pub avg_yearly: f64,
    /// Sample standard deviation of monthly totals, zero months included.
    pub volatility: f64,
    pub active_weeks: usize,
    pub active_months: usize,
    pub active_years: usize,
}

pub fn summarize(transactions: &TransactionSet) -> StatsBundle {
    if transactions.is_empty() {
        return StatsBundle::default();
    }

    let mut costs = transactions.costs();
    let total = costs.iter().sum::<f64>();
    let count = costs.len();
    let stddev = sample_stddev(&costs);
    costs.sort_by(f64::total_cmp);

    let (avg_weekly, active_weeks) = active_average(transactions, Granularity::Week);
    let (avg_monthly, active_months) = active_average(transactions, Granularity::Month);
    let (avg_yearly, active_years) = active_average(transactions, Granularity::Year);

    let stats = StatsBundle {
        total,
        count,
        mean: total / count as f64,
        median: percentile(&costs, 0.5),
        p25: percentile(&costs, 0.25),
        p75: percentile(&costs, 0.75),
        stddev,
        avg_weekly,
        avg_monthly,
        avg_yearly,
        volatility: monthly_volatility(transactions),
        active_weeks,
        active_months,
        active_years,
    };
    debug!(count, total, "summarized transactions");
    stats
}

/// Linear interpolation between closest ranks over ascending `sorted`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample (N-1) standard deviation; zero below two values.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let center = mean(values);
    let squared = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>();
    (squared / (values.len() - 1) as f64).sqrt()
}

fn active_average(transactions: &TransactionSet, granularity: Granularity) -> (f64, usize) {
    let series = bucket(transactions, granularity, BucketSpan::Inferred);
    let active = series
        .active()
        .map(|bucket| bucket.total)
        .collect::<Vec<f64>>();
    (mean(&active), active.len())
}

fn monthly_volatility(transactions: &TransactionSet) -> f64 {
    let Some((start, end)) = transactions.date_bounds() else {
        return 0.0;
    };
    let series = bucket(transactions, Granularity::Month, BucketSpan::Range { start, end });
    sample_stddev(&series.totals())
}
