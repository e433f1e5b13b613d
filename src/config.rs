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

//! # Configuration
//!
//! Every setting comes from the process environment (a flag of the same
//! name overrides it, which is handy for ad-hoc runs). `CliArgs` is the raw
//! view; `AppConfig` is the validated one handed to the orchestrator.

use crate::domain::entities::DestinationSettings;
use crate::domain::errors::{LoaderError, Result};
use crate::domain::table_filter::TableFilters;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

pub const DEFAULT_CHUNK_SIZE: u32 = 100_000;
pub const DEFAULT_LOCATION: &str = "EU";
pub const DEFAULT_PIPELINE_NAME: &str = "db_to_bq_generic";

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line, as Cloud Logging expects.
    #[default]
    Json,
    Text,
}

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Secret Manager reference resolving to the database connection URL
    #[arg(long, env = "DB_URL_SECRET")]
    pub db_url_secret: Option<String>,

    /// Target BigQuery dataset
    #[arg(long, env = "BQ_DATASET_ID")]
    pub bq_dataset_id: Option<String>,

    /// Source schema; the connected user's schema when absent
    #[arg(long, env = "DB_SCHEMA")]
    pub db_schema: Option<String>,

    /// Target GCP project
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
    pub google_cloud_project: Option<String>,

    /// Target BigQuery location
    #[arg(long, env = "BQ_LOCATION")]
    pub bq_location: Option<String>,

    /// Comma-separated tables to load (case-insensitive)
    #[arg(long, env = "TABLES_INCLUDE")]
    pub tables_include: Option<String>,

    /// Comma-separated tables to skip (case-insensitive)
    #[arg(long, env = "TABLES_EXCLUDE")]
    pub tables_exclude: Option<String>,

    /// Only load tables starting with this prefix (case-insensitive)
    #[arg(long, env = "TABLES_PREFIX")]
    pub tables_prefix: Option<String>,

    /// Rows per extraction batch
    #[arg(long, env = "SQL_CHUNK_SIZE")]
    pub sql_chunk_size: Option<String>,

    /// "true" to use the Oracle Instant Client
    #[arg(long, env = "ENABLE_ORACLE_THICK_MODE")]
    pub enable_oracle_thick_mode: Option<String>,

    /// Instant Client library directory (thick mode only)
    #[arg(long, env = "ORACLE_IC_PATH")]
    pub oracle_ic_path: Option<String>,

    /// DEBUG, INFO, WARNING, ERROR or CRITICAL
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    #[arg(long, env = "PIPELINE_NAME")]
    pub pipeline_name: Option<String>,

    /// Where load files are staged before upload
    #[arg(long, env = "STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_url_secret: String,
    pub db_schema: Option<String>,
    pub destination: DestinationSettings,
    pub filters: TableFilters,
    pub chunk_size: u32,
    pub thick_mode: bool,
    pub oracle_ic_path: Option<String>,
    pub pipeline_name: String,
    pub staging_dir: PathBuf,
}

impl AppConfig {
    /// Trims every value, treats blanks as absent, and checks required settings.
    /// Table filters get their raw values; see `TableFilters::parse`.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let db_url_secret = non_empty(&args.db_url_secret)
            .ok_or_else(|| LoaderError::ConfigError("DB_URL_SECRET is required".to_string()))?;
        let dataset_id = non_empty(&args.bq_dataset_id)
            .ok_or_else(|| LoaderError::ConfigError("BQ_DATASET_ID is required".to_string()))?;

        let chunk_size = parse_chunk_size(args.sql_chunk_size.as_deref())?;

        let thick_mode = args
            .enable_oracle_thick_mode
            .as_deref()
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            db_url_secret,
            db_schema: non_empty(&args.db_schema),
            destination: DestinationSettings {
                project_id: non_empty(&args.google_cloud_project),
                dataset_id,
                location: non_empty(&args.bq_location)
                    .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            },
            filters: TableFilters::parse(
                args.tables_include.as_deref(),
                args.tables_exclude.as_deref(),
                args.tables_prefix.as_deref(),
            ),
            chunk_size,
            thick_mode,
            oracle_ic_path: non_empty(&args.oracle_ic_path),
            pipeline_name: non_empty(&args.pipeline_name)
                .unwrap_or_else(|| DEFAULT_PIPELINE_NAME.to_string()),
            staging_dir: args.staging_dir.clone().unwrap_or_else(std::env::temp_dir),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Absent or blank means the default; anything else must be a positive integer.
pub fn parse_chunk_size(raw: Option<&str>) -> Result<u32> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_CHUNK_SIZE),
        Some(v) => match v.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(LoaderError::ConfigError(format!(
                "SQL_CHUNK_SIZE must be a positive integer, got '{}'",
                v
            ))),
        },
    }
}

/// Maps a level name to a filter. Unknown names fall back to INFO.
pub fn parse_log_level(raw: Option<&str>) -> LevelFilter {
    match raw.map(|v| v.trim().to_uppercase()).as_deref() {
        Some("TRACE") => LevelFilter::Trace,
        Some("DEBUG") => LevelFilter::Debug,
        Some("WARNING") | Some("WARN") => LevelFilter::Warn,
        Some("ERROR") | Some("CRITICAL") | Some("FATAL") => LevelFilter::Error,
        Some("OFF") => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}
