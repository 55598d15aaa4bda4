use crate::EngineResult;
use crate::analytics::policy::PATTERN_POLICY_VERSION;
use crate::analytics::report::analyze;
use crate::commands::common::{
    SelectionArgs, SourceOptions, bucket_rows, category_rows, prepare, stats_data, tally_rows,
    transaction_rows,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{QuartileRow, ReportData};

pub fn run(path: &str, selection: SelectionArgs) -> EngineResult<SuccessEnvelope> {
    run_with_options(&SourceOptions::from_path(path), &selection)
}

#[doc(hidden)]
pub fn run_with_options(
    source: &SourceOptions<'_>,
    selection: &SelectionArgs,
) -> EngineResult<SuccessEnvelope> {
    let prepared = prepare(source, selection, "report")?;
    let report = analyze(prepared.transactions(), &prepared.request, &prepared.config);

    let data = ReportData {
        ledger: prepared.ledger_info(),
        selection: prepared.selection_info(),
        policy_version: PATTERN_POLICY_VERSION.to_string(),
        available_years: report.available_years.clone(),
        stats: stats_data(&report.stats),
        monthly: bucket_rows(&report.monthly, prepared.config.patterns.rolling_window),
        categories: category_rows(&report.categories),
        top_items: transaction_rows(&report.top_items),
        bottom_items: transaction_rows(&report.bottom_items),
        recurring: tally_rows(&report.recurring),
        sneaky: tally_rows(&report.sneaky),
        newly_recurring: tally_rows(&report.newly_recurring),
        large_purchases: transaction_rows(&report.large_purchases),
        no_spend_categories: report.no_spend.iter().cloned().collect(),
        quartiles: report
            .quartiles
            .iter()
            .map(|band| QuartileRow {
                quartile: band.quartile.as_str().to_string(),
                upper: band.upper,
                count: band.count as i64,
                total: band.total,
            })
            .collect(),
    };
    success("report", data)
}
