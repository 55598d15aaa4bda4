use serde::{Deserialize, Serialize};

/// Pattern-detection policy identifier.
///
/// Emitted with pattern results so threshold changes stay visible in diffs of
/// saved output.
pub const PATTERN_POLICY_VERSION: &str = "patterns/v1";

/// Thresholds shared by the ranking and pattern detectors.
///
/// `recurring_threshold` and `newly_recurring_threshold` are exclusive lower
/// bounds on occurrence counts. `sneaky_item_cap` is exclusive on individual
/// costs and `sneaky_total_floor` is exclusive on group totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternPolicy {
    pub recurring_threshold: usize,
    /// Lower threshold used by the report bundle, which flags repeats sooner.
    pub report_recurring_threshold: usize,
    pub newly_recurring_threshold: usize,
    pub sneaky_item_cap: f64,
    pub sneaky_total_floor: f64,
    pub top_n: usize,
    pub rolling_window: usize,
}

impl Default for PatternPolicy {
    fn default() -> Self {
        PATTERN_POLICY_V1
    }
}

pub const PATTERN_POLICY_V1: PatternPolicy = PatternPolicy {
    recurring_threshold: 5,
    report_recurring_threshold: 3,
    newly_recurring_threshold: 3,
    sneaky_item_cap: 10.0,
    sneaky_total_floor: 50.0,
    top_n: 10,
    rolling_window: 3,
};

#[cfg(test)]
mod tests {
    use super::{PATTERN_POLICY_V1, PatternPolicy};

    #[test]
    fn report_threshold_is_lower_than_the_standalone_one() {
        let policy = PATTERN_POLICY_V1;
        assert!(policy.report_recurring_threshold < policy.recurring_threshold);
    }

    #[test]
    fn partial_policy_json_fills_missing_fields_from_defaults() {
        let parsed = serde_json::from_str::<PatternPolicy>(r#"{"top_n": 5}"#);
        assert!(parsed.is_ok());
        if let Ok(policy) = parsed {
            assert_eq!(policy.top_n, 5);
            assert_eq!(policy.recurring_threshold, 5);
        }
    }
}
