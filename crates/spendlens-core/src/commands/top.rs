use crate::analytics::ranking::{Order, top_items};
use crate::commands::common::{SelectionArgs, SourceOptions, prepare, transaction_rows};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::TopData;
use crate::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct TopOptions<'a> {
    pub source: SourceOptions<'a>,
    pub selection: SelectionArgs,
    /// Defaults to the configured `top_n`.
    pub limit: Option<usize>,
    pub order: Order,
}

pub fn run(path: &str, selection: SelectionArgs, limit: usize) -> EngineResult<SuccessEnvelope> {
    run_with_options(TopOptions {
        source: SourceOptions::from_path(path),
        selection,
        limit: Some(limit),
        order: Order::Descending,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: TopOptions<'_>) -> EngineResult<SuccessEnvelope> {
    if options.limit == Some(0) {
        return Err(EngineError::invalid_argument_for_command(
            "`--limit` must be at least 1.",
            Some("top"),
        ));
    }
    let prepared = prepare(&options.source, &options.selection, "top")?;
    let limit = options.limit.unwrap_or(prepared.config.patterns.top_n);
    let rows = top_items(&prepared.selected, limit, options.order);

    let data = TopData {
        ledger: prepared.ledger_info(),
        selection: prepared.selection_info(),
        order: options.order.as_str().to_string(),
        limit: limit as i64,
        rows: transaction_rows(&rows),
    };
    success("top", data)
}
