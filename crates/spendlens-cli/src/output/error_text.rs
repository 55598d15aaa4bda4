use serde_json::Value;
use spendlens_core::EngineError;

pub fn render_error(error: &EngineError) -> String {
    let mut lines = vec![
        "Spendlens could not finish this command.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    if let Some(missing) = error
        .data
        .as_ref()
        .and_then(|data| data.get("missing_columns"))
        .and_then(Value::as_array)
    {
        let names = missing
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<&str>>()
            .join(", ");
        lines.push(format!("  Missing:  {names}"));
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}
