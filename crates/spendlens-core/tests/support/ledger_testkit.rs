#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use spendlens_core::commands::common::{SelectionArgs, SourceOptions};
use spendlens_core::{EngineResult, SuccessEnvelope};
use tempfile::{Builder, TempDir};

pub const COFFEE_AND_GAME_CSV: &str = "Item,Category,Cost,Date,Notes\n\
Coffee,Food & Beverages,4.50,2024-01-05,\n\
Coffee,Food & Beverages,4.50,2024-01-20,oat milk\n\
Game,Gaming,60.00,2024-02-01,launch sale\n";

/// Scratch directory holding a config home and any fixture ledgers.
pub struct Workspace {
    _dir: TempDir,
    pub home: PathBuf,
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(prefix: &str) -> std::io::Result<Self> {
        let dir = Builder::new().prefix(prefix).tempdir()?;
        let home = dir.path().join("spendlens-home");
        fs::create_dir_all(&home)?;
        let root = dir.path().to_path_buf();
        Ok(Self {
            _dir: dir,
            home,
            root,
        })
    }

    pub fn write_ledger(&self, name: &str, body: &str) -> String {
        let path = self.root.join(name);
        let written = fs::write(&path, body);
        assert!(written.is_ok());
        path.display().to_string()
    }

    pub fn write_config(&self, body: &str) {
        let written = fs::write(self.home.join("config.json"), body);
        assert!(written.is_ok());
    }

    pub fn source(&self, path: &str) -> SourceOptions<'_> {
        SourceOptions {
            path: Some(path.to_string()),
            stdin_override: None,
            home_override: Some(self.home.as_path()),
        }
    }

    pub fn stdin_source(&self, body: &str) -> SourceOptions<'_> {
        SourceOptions {
            path: Some("-".to_string()),
            stdin_override: Some(body.to_string()),
            home_override: Some(self.home.as_path()),
        }
    }
}

pub fn workspace(prefix: &str) -> Option<Workspace> {
    let created = Workspace::new(prefix);
    assert!(created.is_ok());
    created.ok()
}

pub fn payload(result: EngineResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok(), "command failed: {:?}", result.as_ref().err());
    if let Ok(success) = result {
        let value = serde_json::to_value(success);
        assert!(value.is_ok());
        if let Ok(value) = value {
            return value;
        }
    }
    Value::Null
}

pub fn rows(value: &Value) -> Vec<Value> {
    value["data"]["rows"].as_array().cloned().unwrap_or_default()
}

pub fn year(year: i32) -> SelectionArgs {
    SelectionArgs {
        year: Some(year),
        ..SelectionArgs::default()
    }
}

pub fn close(left: &Value, right: f64) -> bool {
    left.as_f64().is_some_and(|value| (value - right).abs() < 1e-9)
}

