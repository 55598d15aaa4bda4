pub mod coerce;
pub mod input;
pub mod normalize;
pub mod parse;

pub use input::{ResolvedSource, SourceKind, resolve_source};
pub use normalize::{
    CoercionWarning, NormalizeOptions, NormalizeSummary, NormalizedLedger, normalize,
};
pub use parse::{RawLedger, RawRow, parse_source};

use crate::EngineResult;

#[derive(Debug, Clone)]
pub struct LoadedLedger {
    pub source_kind: SourceKind,
    pub source_ref: Option<String>,
    pub ledger: NormalizedLedger,
}

/// Reads, parses and normalizes a ledger in one step.
pub fn load_ledger(
    path: Option<&str>,
    stdin_override: Option<String>,
    options: &NormalizeOptions,
) -> EngineResult<LoadedLedger> {
    let source = resolve_source(path, stdin_override)?;
    let raw = parse_source(&source.content)?;
    let ledger = normalize(&raw, options)?;
    Ok(LoadedLedger {
        source_kind: source.source_kind,
        source_ref: source.source_ref,
        ledger,
    })
}
