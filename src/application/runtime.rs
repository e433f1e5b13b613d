// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Runtime Context
//!
//! Process-wide setup that has to happen exactly once, before the run:
//! 1. **Logging**: `env_logger` behind the `log` facade, JSON lines by default
//!    so Cloud Logging picks up severity and message.
//! 2. **Oracle client**: thick mode loads the Instant Client before any
//!    connection is opened.

use crate::config::{AppConfig, LogFormat};
use crate::domain::errors::Result;
use crate::infrastructure::oracle::client::init_thick_mode;
use log::{Level, LevelFilter, Record};
use serde_json::json;
use std::io::Write;

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(level: LevelFilter, format: LogFormat) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);

    if format == LogFormat::Json {
        builder.format(|buf, record| writeln!(buf, "{}", json_log_line(record)));
    }

    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
}

/// Cloud Logging severity names.
fn severity(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug | Level::Trace => "DEBUG",
    }
}

fn json_log_line(record: &Record) -> String {
    json!({
        "severity": severity(record.level()),
        "message": record.args().to_string(),
        "target": record.target(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })
    .to_string()
}

/// Shared state that exists for the whole run.
pub struct RuntimeContext {
    /// Whether the Oracle Instant Client was loaded.
    pub thick_mode: bool,
}

impl RuntimeContext {
    /// Loads the Oracle client when thick mode is enabled.
    pub fn init(config: &AppConfig) -> Result<Self> {
        if config.thick_mode {
            init_thick_mode(config.oracle_ic_path.as_deref())?;
        }
        Ok(Self {
            thick_mode: config.thick_mode,
        })
    }
}
