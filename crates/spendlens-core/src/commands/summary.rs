use crate::EngineResult;
use crate::analytics::stats::summarize;
use crate::commands::common::{SelectionArgs, SourceOptions, prepare, stats_data};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::SummaryData;

pub fn run(path: &str, selection: SelectionArgs) -> EngineResult<SuccessEnvelope> {
    run_with_options(&SourceOptions::from_path(path), &selection)
}

#[doc(hidden)]
pub fn run_with_options(
    source: &SourceOptions<'_>,
    selection: &SelectionArgs,
) -> EngineResult<SuccessEnvelope> {
    let prepared = prepare(source, selection, "summary")?;
    let stats = summarize(&prepared.selected);

    let data = SummaryData {
        ledger: prepared.ledger_info(),
        selection: prepared.selection_info(),
        stats: stats_data(&stats),
    };
    success("summary", data)
}
