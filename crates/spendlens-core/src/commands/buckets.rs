use crate::EngineResult;
use crate::analytics::bucket::{BucketSpan, bucket};
use crate::analytics::date::{Granularity, WEEK_START};
use crate::analytics::report::ReportRequest;
use crate::analytics::types::TransactionSet;
use crate::analytics::window::Window;
use crate::commands::common::{SelectionArgs, SourceOptions, bucket_rows, prepare};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::BucketsData;

#[derive(Debug, Clone)]
pub struct BucketsOptions<'a> {
    pub source: SourceOptions<'a>,
    pub selection: SelectionArgs,
    pub granularity: Granularity,
    /// Zero-fill every period between the first and last selected date.
    pub dense: bool,
    pub rolling_window: Option<usize>,
}

pub fn run(
    path: &str,
    selection: SelectionArgs,
    granularity: Granularity,
) -> EngineResult<SuccessEnvelope> {
    run_with_options(BucketsOptions {
        source: SourceOptions::from_path(path),
        selection,
        granularity,
        dense: false,
        rolling_window: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: BucketsOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let prepared = prepare(&options.source, &options.selection, "buckets")?;
    let span = resolve_span(&prepared.request, options.dense, &prepared.selected);
    let series = bucket(&prepared.selected, options.granularity, span);
    let rolling_window = options
        .rolling_window
        .unwrap_or(prepared.config.patterns.rolling_window);

    let data = BucketsData {
        ledger: prepared.ledger_info(),
        selection: prepared.selection_info(),
        granularity: options.granularity.as_str().to_string(),
        dense: !matches!(span, BucketSpan::Inferred),
        week_start: WEEK_START.to_string(),
        rolling_window: rolling_window as i64,
        active_buckets: series.active().count() as i64,
        rows: bucket_rows(&series, rolling_window),
    };
    success("buckets", data)
}

/// Year windows and closed `--from`/`--to` ranges are always zero-filled;
/// otherwise `dense` fills between the first and last selected dates.
fn resolve_span(request: &ReportRequest, dense: bool, selected: &TransactionSet) -> BucketSpan {
    if let Window::Year(year) = request.window {
        return BucketSpan::Year(year);
    }
    if let (Some(start), Some(end)) = (request.filters.dates.from, request.filters.dates.to) {
        return BucketSpan::Range { start, end };
    }
    match selected.date_bounds() {
        Some((start, end)) if dense => BucketSpan::Range { start, end },
        _ => BucketSpan::Inferred,
    }
}
