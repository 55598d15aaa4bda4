use crate::cli::Commands;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    if command.ledger().json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
