use std::io;

use serde::Serialize;
use spendlens_core::contracts::envelope::failure_from_error;
use spendlens_core::{EngineError, SuccessEnvelope};

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

/// Failures keep one shape for every command: `ok`, `error`, optional `data`.
pub fn render_error_json(error: &EngineError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use spendlens_core::{EngineError, SuccessEnvelope};

    use super::{render_error_json, render_success_json};

    #[test]
    fn success_json_keeps_the_envelope() {
        let payload = SuccessEnvelope {
            ok: true,
            command: "summary".to_string(),
            version: "0.1.0".to_string(),
            data: json!({"stats": {"total": 69.0}}),
        };
        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(true));
                assert_eq!(value["command"], "summary");
                assert_eq!(value["data"]["stats"]["total"], 69.0);
            }
        }
    }

    #[test]
    fn error_json_carries_code_recovery_and_data() {
        let error = EngineError::ledger_schema_mismatch(
            vec!["Cost".to_string()],
            vec!["Item".to_string()],
            vec![1],
        );
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], Value::Bool(false));
                assert_eq!(value["error"]["code"], "ledger_schema_mismatch");
                assert!(value["error"]["recovery_steps"].is_array());
                assert_eq!(value["data"]["missing_columns"][0], "Cost");
            }
        }
    }
}
