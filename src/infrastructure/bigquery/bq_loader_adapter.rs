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

//! # BigQuery Loader
//!
//! Loads tables one at a time:
//! 1. Stream the source table into a gzip-compressed newline-delimited JSON
//!    file in the staging directory, together with a JSON schema file built
//!    from the source column types.
//! 2. Run `bq load --schema=...` on it. Empty tables are loaded too, so a
//!    replace run leaves an empty destination table rather than stale rows.
//! 3. Delete the staged files (the `NamedTempFile`s go out of scope).
//!
//! Destination names are checked for collisions before anything is
//! extracted. The first table that fails stops the run.

use crate::domain::entities::{
    ColumnSpec, DestinationSettings, LoadInfo, TableLoad, WriteDisposition,
};
use crate::domain::errors::{LoaderError, Result};
use crate::ports::loader_port::LoaderPort;
use crate::ports::source_port::{Record, RecordSink, SourcePort};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

/// One column of a `bq load --schema` JSON file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub mode: String,
}

/// `LoaderPort` implementation driving the `bq` CLI.
pub struct BigQueryLoaderAdapter {
    pipeline_name: String,
    destination: DestinationSettings,
    staging_dir: PathBuf,
}

impl BigQueryLoaderAdapter {
    pub fn new(pipeline_name: String, destination: DestinationSettings, staging_dir: PathBuf) -> Self {
        Self {
            pipeline_name,
            destination,
            staging_dir,
        }
    }

    /// `project:dataset`, or just `dataset` when the project comes from the environment.
    pub fn dataset_ref(&self) -> String {
        match &self.destination.project_id {
            Some(p) => format!("{}:{}", p, self.destination.dataset_id),
            None => self.destination.dataset_id.clone(),
        }
    }

    /// Arguments for one `bq load` invocation.
    pub fn load_args(
        &self,
        table: &str,
        file: &Path,
        schema: &Path,
        disposition: WriteDisposition,
    ) -> Vec<String> {
        let mut args = vec![format!("--location={}", self.destination.location)];
        if let Some(p) = &self.destination.project_id {
            args.push(format!("--project_id={}", p));
        }
        args.push("load".to_string());
        args.push(match disposition {
            WriteDisposition::Replace => "--replace".to_string(),
            WriteDisposition::Append => "--noreplace".to_string(),
        });
        args.push("--source_format=NEWLINE_DELIMITED_JSON".to_string());
        args.push(format!("--schema={}", schema.to_string_lossy()));
        args.push(format!("{}.{}", self.dataset_ref(), table));
        args.push(file.to_string_lossy().into_owned());
        args
    }

    fn load_table(
        &self,
        source: &dyn SourcePort,
        resource: &str,
        destination_table: String,
        staging: &Path,
        disposition: WriteDisposition,
    ) -> Result<TableLoad> {
        let start = Instant::now();
        info!(
            "Extracting {} into {}.{}",
            resource,
            self.dataset_ref(),
            destination_table
        );

        let staged = tempfile::Builder::new()
            .prefix(&format!("{}_", destination_table))
            .suffix(".jsonl.gz")
            .tempfile_in(staging)?;

        let mut sink = NdjsonGzSink::new(staged.reopen()?, &destination_table);
        let rows = source.stream_resource(resource, &mut sink)?;
        let fields = sink.finish()?;
        let bytes = fs::metadata(staged.path())?.len();

        if rows == 0 {
            warn!(
                "Table {} is empty; {} will be left empty",
                resource, destination_table
            );
        }

        let schema = tempfile::Builder::new()
            .prefix(&format!("{}_", destination_table))
            .suffix(".schema.json")
            .tempfile_in(staging)?;
        write_schema(schema.reopen()?, &fields)?;
        debug!("Schema for {}: {:?}", destination_table, fields);

        let args = self.load_args(&destination_table, staged.path(), schema.path(), disposition);
        info!("Loading {} rows ({} bytes) with: bq {}", rows, bytes, args.join(" "));
        let output = Command::new("bq")
            .args(&args)
            .output()
            .map_err(|e| LoaderError::LoadError {
                table: destination_table.clone(),
                reason: format!("Failed to run bq: {}", e),
            })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LoaderError::LoadError {
                table: destination_table,
                reason: format!("{} {}", stdout.trim(), stderr.trim()).trim().to_string(),
            });
        }

        let duration = start.elapsed().as_secs_f64();
        info!(
            "Loaded {} rows into {} in {:.2}s",
            rows, destination_table, duration
        );

        Ok(TableLoad {
            resource: resource.to_string(),
            destination_table,
            rows,
            bytes,
            duration,
        })
    }
}

impl LoaderPort for BigQueryLoaderAdapter {
    fn run(&self, source: &dyn SourcePort, disposition: WriteDisposition) -> Result<LoadInfo> {
        let start = Instant::now();
        let resources = source.selected_resources()?;
        let targets = destination_tables(&resources)?;

        let staging = self.staging_dir.join(&self.pipeline_name);
        fs::create_dir_all(&staging)?;

        let mut tables = Vec::with_capacity(targets.len());
        for (resource, destination_table) in targets {
            tables.push(self.load_table(source, &resource, destination_table, &staging, disposition)?);
        }

        Ok(LoadInfo {
            pipeline_name: self.pipeline_name.clone(),
            dataset: self.dataset_ref(),
            write_disposition: disposition,
            tables,
            duration: start.elapsed().as_secs_f64(),
        })
    }
}

/// Pairs every resource with its destination table, failing if two
/// resources would land in the same table.
pub fn destination_tables(resources: &[String]) -> Result<Vec<(String, String)>> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut targets = Vec::with_capacity(resources.len());
    for resource in resources {
        let table = bq_identifier(resource);
        if let Some(other) = seen.insert(table.clone(), resource) {
            return Err(LoaderError::LoadError {
                reason: format!(
                    "source tables {} and {} both map to {}",
                    other, resource, table
                ),
                table,
            });
        }
        targets.push((resource.clone(), table));
    }
    Ok(targets)
}

fn write_schema(file: File, fields: &[SchemaField]) -> Result<()> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, fields)?;
    writer.flush()?;
    Ok(())
}

/// Writes records as gzip-compressed JSON lines, keyed by BigQuery column names.
pub struct NdjsonGzSink {
    encoder: GzEncoder<BufWriter<File>>,
    table: String,
    /// (source column, destination column), set by `begin`.
    columns: Option<Vec<(String, String)>>,
    fields: Vec<SchemaField>,
}

impl NdjsonGzSink {
    pub fn new(file: File, table: &str) -> Self {
        let buf_writer = BufWriter::with_capacity(128 * 1024, file);
        Self {
            encoder: GzEncoder::new(buf_writer, Compression::fast()),
            table: table.to_string(),
            columns: None,
            fields: Vec::new(),
        }
    }

    /// Writes the gzip trailer, flushes everything to disk and returns the
    /// schema of what was written.
    pub fn finish(self) -> Result<Vec<SchemaField>> {
        if self.columns.is_none() {
            return Err(LoaderError::LoadError {
                table: self.table,
                reason: "source sent no column metadata".to_string(),
            });
        }
        let mut buf_writer = self.encoder.finish()?;
        buf_writer.flush()?;
        Ok(self.fields)
    }
}

impl RecordSink for NdjsonGzSink {
    fn begin(&mut self, columns: &[ColumnSpec]) -> Result<()> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut renames = Vec::with_capacity(columns.len());
        let mut fields = Vec::with_capacity(columns.len());
        for column in columns {
            let name = bq_identifier(&column.name);
            if let Some(other) = seen.insert(name.clone(), &column.name) {
                return Err(LoaderError::LoadError {
                    table: self.table.clone(),
                    reason: format!(
                        "columns {} and {} both map to {}",
                        other, column.name, name
                    ),
                });
            }
            renames.push((column.name.clone(), name.clone()));
            fields.push(SchemaField {
                name,
                field_type: column.bq_type.clone(),
                mode: "NULLABLE".to_string(),
            });
        }
        self.columns = Some(renames);
        self.fields = fields;
        Ok(())
    }

    fn write_batch(&mut self, batch: &[Record]) -> Result<()> {
        let columns = self.columns.as_ref().ok_or_else(|| LoaderError::LoadError {
            table: self.table.clone(),
            reason: "records arrived before column metadata".to_string(),
        })?;
        for record in batch {
            let mut out = Record::new();
            for (source, destination) in columns {
                let value = record.get(source).cloned().unwrap_or(Value::Null);
                out.insert(destination.clone(), value);
            }
            serde_json::to_writer(&mut self.encoder, &out)?;
            self.encoder.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// BigQuery identifier for a source table or column: lower-case,
/// `[a-z0-9_]` only, never starting with a digit.
pub fn bq_identifier(name: &str) -> String {
    let mut out: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use serde_json::json;
    use std::io::Read;
    use std::sync::Mutex;

    fn adapter(project: Option<&str>) -> BigQueryLoaderAdapter {
        BigQueryLoaderAdapter::new(
            "db_to_bq_generic".to_string(),
            DestinationSettings {
                project_id: project.map(str::to_string),
                dataset_id: "raw_erp".to_string(),
                location: "EU".to_string(),
            },
            std::env::temp_dir(),
        )
    }

    fn column(name: &str, bq_type: &str) -> ColumnSpec {
        ColumnSpec {
            name: name.to_string(),
            bq_type: bq_type.to_string(),
        }
    }

    fn read_gz(path: &Path) -> String {
        let mut text = String::new();
        GzDecoder::new(File::open(path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    /// Records every resource it is asked to stream.
    struct RecordingSource {
        tables: Vec<String>,
        streamed: Mutex<Vec<String>>,
    }

    impl SourcePort for RecordingSource {
        fn list_resources(&self) -> Result<Vec<String>> {
            Ok(self.tables.clone())
        }

        fn with_resources(&mut self, _names: &[String]) -> Result<()> {
            Ok(())
        }

        fn selected_resources(&self) -> Result<Vec<String>> {
            Ok(self.tables.clone())
        }

        fn stream_resource(&self, resource: &str, sink: &mut dyn RecordSink) -> Result<u64> {
            self.streamed.lock().unwrap().push(resource.to_string());
            sink.begin(&[])?;
            Ok(0)
        }
    }

    #[test]
    fn test_bq_identifier() {
        assert_eq!(bq_identifier("EMPLOYEES"), "employees");
        assert_eq!(bq_identifier("Order Items"), "order_items");
        assert_eq!(bq_identifier("SALES$2024"), "sales_2024");
        assert_eq!(bq_identifier("2024_SALES"), "_2024_sales");
    }

    #[test]
    fn test_load_args_with_project() {
        let args = adapter(Some("acme")).load_args(
            "employees",
            Path::new("/tmp/employees.jsonl.gz"),
            Path::new("/tmp/employees.schema.json"),
            WriteDisposition::Replace,
        );
        assert_eq!(
            args,
            vec![
                "--location=EU",
                "--project_id=acme",
                "load",
                "--replace",
                "--source_format=NEWLINE_DELIMITED_JSON",
                "--schema=/tmp/employees.schema.json",
                "acme:raw_erp.employees",
                "/tmp/employees.jsonl.gz",
            ]
        );
    }

    #[test]
    fn test_load_args_without_project_append() {
        let args = adapter(None).load_args(
            "t",
            Path::new("f.gz"),
            Path::new("s.json"),
            WriteDisposition::Append,
        );
        assert!(!args.iter().any(|a| a.starts_with("--project_id")));
        assert!(args.contains(&"--noreplace".to_string()));
        assert!(args.contains(&"raw_erp.t".to_string()));
    }

    #[test]
    fn test_empty_table_still_replaces_with_explicit_schema() {
        let staged = tempfile::NamedTempFile::new().unwrap();
        let mut sink = NdjsonGzSink::new(staged.reopen().unwrap(), "audit_log");
        sink.begin(&[column("ID", "INT64"), column("AMOUNT", "BIGNUMERIC")])
            .unwrap();
        let fields = sink.finish().unwrap();
        assert_eq!(read_gz(staged.path()), "");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_type, "INT64");

        let args = adapter(None).load_args(
            "audit_log",
            staged.path(),
            Path::new("/tmp/audit_log.schema.json"),
            WriteDisposition::Replace,
        );
        assert!(args.contains(&"--replace".to_string()));
        assert!(args.contains(&"--schema=/tmp/audit_log.schema.json".to_string()));
        assert!(!args.iter().any(|a| a == "--autodetect"));
    }

    #[test]
    fn test_write_schema() {
        let schema = tempfile::NamedTempFile::new().unwrap();
        let fields = vec![SchemaField {
            name: "id".to_string(),
            field_type: "INT64".to_string(),
            mode: "NULLABLE".to_string(),
        }];
        write_schema(schema.reopen().unwrap(), &fields).unwrap();

        let written: Value =
            serde_json::from_str(&fs::read_to_string(schema.path()).unwrap()).unwrap();
        assert_eq!(
            written,
            json!([{"name": "id", "type": "INT64", "mode": "NULLABLE"}])
        );
    }

    #[test]
    fn test_destination_tables_detects_collisions() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let ok = destination_tables(&names(&["EMP", "DEPT"])).unwrap();
        assert_eq!(
            ok,
            vec![
                ("EMP".to_string(), "emp".to_string()),
                ("DEPT".to_string(), "dept".to_string())
            ]
        );

        let err = destination_tables(&names(&["Orders", "ORDERS"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Load failed for orders: source tables Orders and ORDERS both map to orders"
        );

        let err = destination_tables(&names(&["SALES$2024", "SALES_2024"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("SALES$2024"));
        assert!(message.contains("SALES_2024"));
    }

    #[test]
    fn test_run_fails_on_collision_before_extracting() {
        let source = RecordingSource {
            tables: vec!["EMP".to_string(), "Orders".to_string(), "ORDERS".to_string()],
            streamed: Mutex::new(Vec::new()),
        };
        let err = adapter(None)
            .run(&source, WriteDisposition::Replace)
            .unwrap_err();
        assert!(matches!(err, LoaderError::LoadError { ref table, .. } if table == "orders"));
        assert!(source.streamed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_ndjson_sink_renames_columns() {
        let staged = tempfile::NamedTempFile::new().unwrap();
        let mut sink = NdjsonGzSink::new(staged.reopen().unwrap(), "people");
        sink.begin(&[column("ID", "INT64"), column("First Name", "STRING")])
            .unwrap();

        let mut first = Record::new();
        first.insert("ID".to_string(), json!(1));
        first.insert("First Name".to_string(), json!("Ada"));
        let mut second = Record::new();
        second.insert("ID".to_string(), json!(2));
        second.insert("First Name".to_string(), Value::Null);

        sink.write_batch(&[first]).unwrap();
        sink.write_batch(&[second]).unwrap();
        let fields = sink.finish().unwrap();
        assert_eq!(fields[1].name, "first_name");
        assert_eq!(fields[1].field_type, "STRING");

        let lines: Vec<Value> = read_gz(staged.path())
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(
            lines,
            vec![
                json!({"id": 1, "first_name": "Ada"}),
                json!({"id": 2, "first_name": null})
            ]
        );
    }

    #[test]
    fn test_ndjson_sink_rejects_column_collisions() {
        let staged = tempfile::NamedTempFile::new().unwrap();
        let mut sink = NdjsonGzSink::new(staged.reopen().unwrap(), "t");
        let err = sink
            .begin(&[column("Name", "STRING"), column("NAME", "STRING")])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Load failed for t: columns Name and NAME both map to name"
        );
    }

    #[test]
    fn test_ndjson_sink_requires_columns() {
        let staged = tempfile::NamedTempFile::new().unwrap();
        let mut sink = NdjsonGzSink::new(staged.reopen().unwrap(), "t");
        assert!(sink.write_batch(&[Record::new()]).is_err());
    }
}
