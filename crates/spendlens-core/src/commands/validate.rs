use crate::EngineResult;
use crate::commands::common::{SourceOptions, ledger_info};
use crate::config::load_config;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ValidateData;
use crate::ledger::load_ledger;

pub fn run(path: &str) -> EngineResult<SuccessEnvelope> {
    run_with_options(&SourceOptions::from_path(path))
}

/// Normalizes the ledger and reports every coercion diagnostic.
///
/// Schema mismatches still fail; bad values only show up as diagnostics.
#[doc(hidden)]
pub fn run_with_options(source: &SourceOptions<'_>) -> EngineResult<SuccessEnvelope> {
    let config = load_config(source.home_override)?.config;
    let loaded = load_ledger(
        source.path.as_deref(),
        source.stdin_override.clone(),
        &config.normalize_options(),
    )?;

    let data = ValidateData {
        ledger: ledger_info(&loaded),
        valid: loaded.ledger.diagnostics.is_empty(),
        diagnostics: loaded.ledger.diagnostics.clone(),
    };
    success("validate", data)
}
