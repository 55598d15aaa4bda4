//! Pure aggregation engine over a normalized `TransactionSet`.
//!
//! Nothing here touches files, the network, or global state; every function
//! takes a shared reference and returns owned results.

pub mod bucket;
pub mod category;
pub mod date;
pub mod filter;
pub mod patterns;
pub mod policy;
pub mod ranking;
pub mod report;
pub mod stats;
pub mod trends;
pub mod types;
pub mod window;

pub use bucket::{Bucket, BucketSpan, TimeBucketSeries, bucket, month_details};
pub use category::{
    CategoryGrid, CategoryTotal, CategoryTotals, by_category, category_month_grid,
    category_year_totals,
};
pub use date::{Granularity, WEEK_START};
pub use filter::{CostRange, DateRange, FilterSet, SEARCH_MIN_CHARS, filter};
pub use patterns::{ItemTally, newly_recurring, no_spend_categories, recurring_items, sneaky_totals};
pub use ranking::{Order, large_purchases, top_items};
pub use report::{AnalysisReport, ReportRequest, analyze};
pub use stats::{StatsBundle, summarize};
pub use trends::{
    Quartile, QuartileBand, TrendPoint, cumulative, month_items, quartile_distribution,
    rolling_average,
};
pub use types::{MISCELLANEOUS_CATEGORY, Transaction, TransactionSet};
pub use window::{Window, available_years};
