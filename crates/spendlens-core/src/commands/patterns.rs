use crate::EngineResult;
use crate::analytics::patterns::{
    newly_recurring, no_spend_categories, recurring_items, sneaky_totals,
};
use crate::analytics::policy::PATTERN_POLICY_VERSION;
use crate::analytics::ranking::{large_purchase_threshold, large_purchases};
use crate::commands::common::{
    Prepared, SelectionArgs, SourceOptions, prepare, tally_rows, transaction_rows,
};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    LargePurchasesData, NoSpendData, PatternData, PatternThresholds, TallyRow,
};

/// Threshold overrides; `None` falls back to the configured policy.
#[derive(Debug, Clone, Default)]
pub struct PatternOverrides {
    pub threshold: Option<usize>,
    pub item_cost_cap: Option<f64>,
    pub total_floor: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PatternOptions<'a> {
    pub source: SourceOptions<'a>,
    pub selection: SelectionArgs,
    pub overrides: PatternOverrides,
}

impl<'a> PatternOptions<'a> {
    pub fn new(source: SourceOptions<'a>, selection: SelectionArgs) -> Self {
        Self {
            source,
            selection,
            overrides: PatternOverrides::default(),
        }
    }
}

pub fn recurring(options: PatternOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let prepared = prepare(&options.source, &options.selection, "recurring")?;
    let threshold = options
        .overrides
        .threshold
        .unwrap_or(prepared.config.patterns.recurring_threshold);
    let rows = recurring_items(&prepared.selected, threshold);

    let data = pattern_data(
        &prepared,
        PatternThresholds {
            count_above: Some(threshold as i64),
            item_cost_below: None,
            total_above: None,
        },
        tally_rows(&rows),
    );
    success("recurring", data)
}

pub fn sneaky(options: PatternOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let prepared = prepare(&options.source, &options.selection, "sneaky")?;
    let policy = prepared.config.patterns;
    let cap = options.overrides.item_cost_cap.unwrap_or(policy.sneaky_item_cap);
    let floor = options.overrides.total_floor.unwrap_or(policy.sneaky_total_floor);
    let rows = sneaky_totals(&prepared.selected, cap, floor);

    let data = pattern_data(
        &prepared,
        PatternThresholds {
            count_above: None,
            item_cost_below: Some(cap),
            total_above: Some(floor),
        },
        tally_rows(&rows),
    );
    success("sneaky", data)
}

pub fn newly(options: PatternOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let prepared = prepare(&options.source, &options.selection, "newly-recurring")?;
    let threshold = options
        .overrides
        .threshold
        .unwrap_or(prepared.config.patterns.newly_recurring_threshold);
    let rows = newly_recurring(&prepared.selected, threshold);

    let data = pattern_data(
        &prepared,
        PatternThresholds {
            count_above: Some(threshold as i64),
            item_cost_below: None,
            total_above: None,
        },
        tally_rows(&rows),
    );
    success("newly-recurring", data)
}

pub fn large(options: PatternOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let prepared = prepare(&options.source, &options.selection, "large")?;
    let rows = large_purchases(&prepared.selected);
    let threshold = if prepared.selected.is_empty() {
        0.0
    } else {
        large_purchase_threshold(&prepared.selected.costs())
    };

    let data = LargePurchasesData {
        ledger: prepared.ledger_info(),
        selection: prepared.selection_info(),
        policy_version: PATTERN_POLICY_VERSION.to_string(),
        threshold,
        rows: transaction_rows(&rows),
    };
    success("large", data)
}

pub fn no_spend(options: PatternOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let prepared = prepare(&options.source, &options.selection, "no-spend")?;
    let missing = no_spend_categories(&prepared.selected, &prepared.config.categories);

    let data = NoSpendData {
        ledger: prepared.ledger_info(),
        selection: prepared.selection_info(),
        canonical_categories: prepared.config.categories.clone(),
        categories: missing.into_iter().collect(),
    };
    success("no-spend", data)
}

fn pattern_data(
    prepared: &Prepared,
    thresholds: PatternThresholds,
    rows: Vec<TallyRow>,
) -> PatternData {
    PatternData {
        ledger: prepared.ledger_info(),
        selection: prepared.selection_info(),
        policy_version: PATTERN_POLICY_VERSION.to_string(),
        thresholds,
        rows,
    }
}
