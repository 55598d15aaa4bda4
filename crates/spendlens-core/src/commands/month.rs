use crate::analytics::trends::month_items;
use crate::analytics::types::month_name;
use crate::commands::common::{SelectionArgs, SourceOptions, prepare, transaction_rows};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::MonthData;
use crate::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct MonthOptions<'a> {
    pub source: SourceOptions<'a>,
    pub selection: SelectionArgs,
    pub year: i32,
    pub month: u32,
}

pub fn run(path: &str, year: i32, month: u32) -> EngineResult<SuccessEnvelope> {
    run_with_options(MonthOptions {
        source: SourceOptions::from_path(path),
        selection: SelectionArgs::default(),
        year,
        month,
    })
}

/// Drill-down into one calendar month of the selection.
#[doc(hidden)]
pub fn run_with_options(options: MonthOptions<'_>) -> EngineResult<SuccessEnvelope> {
    if !(1..=12).contains(&options.month) {
        return Err(EngineError::invalid_argument_for_command(
            "`month` must be between 1 and 12.",
            Some("month"),
        ));
    }
    let prepared = prepare(&options.source, &options.selection, "month")?;
    let rows = month_items(&prepared.selected, options.year, options.month);

    let data = MonthData {
        ledger: prepared.ledger_info(),
        selection: prepared.selection_info(),
        year: options.year,
        month: options.month,
        label: format!("{} {}", month_name(options.month), options.year),
        total: rows.iter().map(|row| row.cost).sum(),
        rows: transaction_rows(&rows),
    };
    success("month", data)
}
