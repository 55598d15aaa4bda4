use std::collections::BTreeSet;

use chrono::Datelike;

use crate::analytics::bucket::BucketSpan;
use crate::analytics::date::{add_months_clamped, first_of_month, last_of_year};
use crate::analytics::filter::DateRange;
use crate::analytics::types::TransactionSet;

/// Named date selection offered alongside the explicit filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Window {
    #[default]
    All,
    Year(i32),
    LastTwelveMonths,
}

impl Window {
    pub fn label(self) -> String {
        match self {
            Self::All => "All".to_string(),
            Self::Year(year) => year.to_string(),
            Self::LastTwelveMonths => "Last 12 months".to_string(),
        }
    }

    /// Date bounds selected by this window over `transactions`.
    ///
    /// `LastTwelveMonths` is anchored on the latest transaction, not today.
    pub fn date_range(self, transactions: &TransactionSet) -> DateRange {
        match self {
            Self::All => DateRange::default(),
            Self::Year(year) => DateRange {
                from: first_of_month(year, 1),
                to: last_of_year(year),
            },
            Self::LastTwelveMonths => {
                let Some((_, latest)) = transactions.date_bounds() else {
                    return DateRange::default();
                };
                let latest_month = first_of_month(latest.year(), latest.month()).unwrap_or(latest);
                DateRange {
                    from: Some(add_months_clamped(latest_month, -11)),
                    to: None,
                }
            }
        }
    }

    /// Span used for monthly views so a calendar year always shows 12 months.
    pub fn bucket_span(self) -> BucketSpan {
        match self {
            Self::Year(year) => BucketSpan::Year(year),
            Self::All | Self::LastTwelveMonths => BucketSpan::Inferred,
        }
    }
}

/// Distinct calendar years present, newest first.
pub fn available_years(transactions: &TransactionSet) -> Vec<i32> {
    transactions
        .iter()
        .map(|transaction| transaction.year())
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .rev()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Window, available_years};
    use crate::analytics::filter::DateRange;
    use crate::analytics::types::{Transaction, TransactionSet};

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    fn sample() -> TransactionSet {
        TransactionSet::new(vec![
            Transaction::new("Book", "Books", 12.0, date("2023-02-14"), ""),
            Transaction::new("Coffee", "Food", 4.5, date("2023-03-31"), ""),
            Transaction::new("Game", "Gaming", 60.0, date("2024-02-20"), ""),
        ])
    }

    #[test]
    fn last_twelve_months_starts_eleven_months_before_the_latest_month() {
        let range = Window::LastTwelveMonths.date_range(&sample());
        assert_eq!(range.from, Some(date("2023-03-01")));
        assert!(range.to.is_none());
        assert!(!range.contains(date("2023-02-14")));
        assert!(range.contains(date("2023-03-31")));
    }

    #[test]
    fn year_window_covers_the_calendar_year() {
        let range = Window::Year(2023).date_range(&sample());
        assert_eq!(range, DateRange::between(date("2023-01-01"), date("2023-12-31")));
    }

    #[test]
    fn windows_over_empty_sets_do_not_restrict() {
        assert!(
            Window::LastTwelveMonths
                .date_range(&TransactionSet::empty())
                .is_unbounded()
        );
        assert!(Window::All.date_range(&sample()).is_unbounded());
    }

    #[test]
    fn years_are_listed_newest_first() {
        assert_eq!(available_years(&sample()), vec![2024, 2023]);
        assert_eq!(Window::LastTwelveMonths.label(), "Last 12 months");
    }
}
