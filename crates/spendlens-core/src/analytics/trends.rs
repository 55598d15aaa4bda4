use chrono::NaiveDate;

use crate::analytics::bucket::TimeBucketSeries;
use crate::analytics::stats::percentile;
use crate::analytics::types::{Transaction, TransactionSet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub start: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quartile {
    pub const ALL: [Quartile; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }
}

/// Cost band of the spend distribution. `upper` is inclusive; Q4 has none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuartileBand {
    pub quartile: Quartile,
    pub upper: Option<f64>,
    pub count: usize,
    pub total: f64,
}

/// Trailing mean over up to `window` buckets, shorter at the start.
pub fn rolling_average(series: &TimeBucketSeries, window: usize) -> Vec<TrendPoint> {
    let window = window.max(1);
    let totals = series.totals();
    series
        .buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| {
            let first = (index + 1).saturating_sub(window);
            let slice = &totals[first..=index];
            TrendPoint {
                start: bucket.start,
                value: slice.iter().sum::<f64>() / slice.len() as f64,
            }
        })
        .collect()
}

pub fn cumulative(series: &TimeBucketSeries) -> Vec<TrendPoint> {
    let mut running = 0.0;
    series
        .buckets
        .iter()
        .map(|bucket| {
            running += bucket.total;
            TrendPoint {
                start: bucket.start,
                value: running,
            }
        })
        .collect()
}

/// Splits spend into four cost bands at p25, the median and p75.
pub fn quartile_distribution(transactions: &TransactionSet) -> [QuartileBand; 4] {
    let mut sorted = transactions.costs();
    sorted.sort_by(f64::total_cmp);

    let cuts = if sorted.is_empty() {
        [None, None, None]
    } else {
        [
            Some(percentile(&sorted, 0.25)),
            Some(percentile(&sorted, 0.5)),
            Some(percentile(&sorted, 0.75)),
        ]
    };

    let mut bands = Quartile::ALL.map(|quartile| QuartileBand {
        quartile,
        upper: match quartile {
            Quartile::Q1 => cuts[0],
            Quartile::Q2 => cuts[1],
            Quartile::Q3 => cuts[2],
            Quartile::Q4 => None,
        },
        count: 0,
        total: 0.0,
    });

    for cost in &sorted {
        let index = bands
            .iter()
            .position(|band| band.upper.is_some_and(|upper| *cost <= upper))
            .unwrap_or(3);
        bands[index].count += 1;
        bands[index].total += cost;
    }
    bands
}

/// One month's transactions in date order, ties kept in ledger order.
pub fn month_items(transactions: &TransactionSet, year: i32, month: u32) -> Vec<Transaction> {
    let mut rows = transactions
        .iter()
        .filter(|transaction| transaction.year() == year && transaction.month_num() == month)
        .cloned()
        .collect::<Vec<Transaction>>();
    rows.sort_by_key(|transaction| transaction.date);
    rows
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Quartile, cumulative, month_items, quartile_distribution, rolling_average};
    use crate::analytics::bucket::{Bucket, TimeBucketSeries};
    use crate::analytics::date::Granularity;
    use crate::analytics::types::{Transaction, TransactionSet};

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    fn series(totals: &[f64]) -> TimeBucketSeries {
        let mut start = date("2024-01-01");
        let mut buckets = Vec::new();
        for total in totals {
            buckets.push(Bucket {
                start,
                total: *total,
                count: 1,
            });
            start = Granularity::Month.advance(start);
        }
        TimeBucketSeries {
            granularity: Granularity::Month,
            buckets,
        }
    }

    #[test]
    fn rolling_average_uses_partial_windows_at_the_start() {
        let values = rolling_average(&series(&[3.0, 6.0, 9.0, 12.0]), 3)
            .into_iter()
            .map(|point| point.value)
            .collect::<Vec<f64>>();
        assert_eq!(values, vec![3.0, 4.5, 6.0, 9.0]);
    }

    #[test]
    fn zero_window_behaves_like_one() {
        let values = rolling_average(&series(&[3.0, 6.0]), 0)
            .into_iter()
            .map(|point| point.value)
            .collect::<Vec<f64>>();
        assert_eq!(values, vec![3.0, 6.0]);
    }

    #[test]
    fn cumulative_ends_at_the_series_total() {
        let points = cumulative(&series(&[9.0, 60.0, 0.0]));
        assert_eq!(points.last().map(|point| point.value), Some(69.0));
        assert_eq!(points[1].start, date("2024-02-01"));
    }

    #[test]
    fn quartile_bands_partition_every_cost() {
        let set = TransactionSet::new(
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]
                .iter()
                .map(|cost| Transaction::new("x", "Misc", *cost, date("2024-01-01"), ""))
                .collect(),
        );
        let bands = quartile_distribution(&set);
        let counts = bands.iter().map(|band| band.count).collect::<Vec<usize>>();
        assert_eq!(counts, vec![2, 2, 2, 2]);
        assert_eq!(bands.iter().map(|band| band.total).sum::<f64>(), 36.0);
        assert_eq!(bands[3].quartile, Quartile::Q4);
    }

    #[test]
    fn empty_distribution_has_four_zero_bands() {
        let bands = quartile_distribution(&TransactionSet::empty());
        assert!(bands.iter().all(|band| band.count == 0 && band.total == 0.0));
    }

    #[test]
    fn month_items_sort_by_date() {
        let set = TransactionSet::new(vec![
            Transaction::new("Late", "Misc", 1.0, date("2024-03-20"), ""),
            Transaction::new("Other", "Misc", 1.0, date("2024-04-01"), ""),
            Transaction::new("Early", "Misc", 1.0, date("2024-03-02"), ""),
        ]);
        let rows = month_items(&set, 2024, 3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item, "Early");
    }
}
