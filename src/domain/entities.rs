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

//! # Domain Entities
//!
//! The "Nouns" of a load run: where we read from, where we write to,
//! how we write, and what happened.
//!
//! `LoadInfo` derives `Serialize` so the end-of-run summary is logged as JSON.

use serde::Serialize;
use std::fmt;

/// Everything needed to open an extraction source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// The (possibly normalized) database connection URL.
    pub connection_url: String,
    /// Schema to introspect. `None` means the connected user's own schema.
    pub schema: Option<String>,
    /// Rows fetched per round-trip and handed to the loader per batch.
    pub chunk_size: u32,
}

/// The BigQuery dataset we load into.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationSettings {
    pub project_id: Option<String>,
    pub dataset_id: String,
    pub location: String,
}

/// `WriteDisposition` decides what happens to rows already in the destination table.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WriteDisposition {
    /// Each run fully overwrites the destination table.
    Replace,
    /// Rows are added to whatever the table already holds.
    Append,
}

impl fmt::Display for WriteDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteDisposition::Replace => write!(f, "replace"),
            WriteDisposition::Append => write!(f, "append"),
        }
    }
}

/// One source column as the loader sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column name in the source, also the key used in extracted records.
    pub name: String,
    /// BigQuery type of the destination column (e.g. "INT64").
    pub bq_type: String,
}

/// Captures what happened to one source table.
#[derive(Debug, Clone, Serialize)]
pub struct TableLoad {
    /// Source resource name, as listed by the source.
    pub resource: String,
    /// Destination table inside the dataset.
    pub destination_table: String,
    pub rows: u64,
    /// Compressed bytes staged for upload.
    pub bytes: u64,
    pub duration: f64,
}

/// `LoadInfo` is the summary returned by a loader once every table is done.
#[derive(Debug, Clone, Serialize)]
pub struct LoadInfo {
    pub pipeline_name: String,
    /// Fully qualified dataset, e.g. `my-project:raw_erp`.
    pub dataset: String,
    pub write_disposition: WriteDisposition,
    pub tables: Vec<TableLoad>,
    pub duration: f64,
}

impl LoadInfo {
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

impl fmt::Display for LoadInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pipeline {} loaded {} tables ({} rows) into {} with write disposition {} in {:.2}s",
            self.pipeline_name,
            self.tables.len(),
            self.total_rows(),
            self.dataset,
            self.write_disposition,
            self.duration
        )
    }
}

/// What a run ended with, when it did not fail.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Loaded(LoadInfo),
    /// The filters left nothing to load. Not an error.
    NothingSelected,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, rows: u64) -> TableLoad {
        TableLoad {
            resource: name.to_string(),
            destination_table: name.to_lowercase(),
            rows,
            bytes: rows * 10,
            duration: 0.5,
        }
    }

    #[test]
    fn test_load_info_summary() {
        let info = LoadInfo {
            pipeline_name: "db_to_bq_generic".to_string(),
            dataset: "proj:raw".to_string(),
            write_disposition: WriteDisposition::Replace,
            tables: vec![
                table("EMPLOYEES", 10),
                table("EMPTY_ONE", 0),
            ],
            duration: 1.234,
        };

        assert_eq!(info.total_rows(), 10);
        assert_eq!(
            info.to_string(),
            "Pipeline db_to_bq_generic loaded 2 tables (10 rows) into proj:raw with write disposition replace in 1.23s"
        );
    }

    #[test]
    fn test_load_info_serializes_for_structured_logs() {
        let info = LoadInfo {
            pipeline_name: "db_to_bq_generic".to_string(),
            dataset: "raw".to_string(),
            write_disposition: WriteDisposition::Replace,
            tables: vec![table("EMPLOYEES", 3)],
            duration: 0.0,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["write_disposition"], "replace");
        assert_eq!(json["tables"][0]["destination_table"], "employees");
        assert_eq!(json["tables"][0]["rows"], 3);
    }
}
