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

//! Infrastructure adapter that lists and streams Oracle tables.
//!
//! Rows are converted to JSON objects so the loader can stage them as
//! newline-delimited JSON without knowing anything about Oracle types.

use crate::domain::bq_type_mapper::map_oracle_to_bq;
use crate::domain::entities::{ColumnSpec, SourceSettings};
use crate::domain::errors::{LoaderError, Result};
use crate::infrastructure::oracle::connection_url::OracleConnectParams;
use crate::ports::source_port::{Record, RecordSink, SourceConnector, SourcePort};
use base64::{engine::general_purpose, Engine as _};
use log::{debug, info};
use oracle::{sql_type::OracleType, sql_type::Timestamp, Connection, Row};
use serde_json::{Number, Value};

const SQL_LIST_TABLES: &str =
    "SELECT table_name FROM all_tables WHERE owner = :1 ORDER BY table_name";
const SQL_LIST_USER_TABLES: &str = "SELECT table_name FROM user_tables ORDER BY table_name";

/// Opens `OracleSource`s from a connection URL.
#[derive(Debug, Default)]
pub struct OracleConnector;

impl OracleConnector {
    pub fn new() -> Self {
        Self
    }
}

impl SourceConnector for OracleConnector {
    fn connect(&self, settings: &SourceSettings) -> Result<Box<dyn SourcePort>> {
        let params = OracleConnectParams::from_url(&settings.connection_url)?;
        info!(
            "Connecting to Oracle at {} as {}",
            params.connect_string, params.username
        );
        let conn = Connection::connect(&params.username, &params.password, &params.connect_string)?;
        Ok(Box::new(OracleSource::new(
            conn,
            settings.schema.clone(),
            settings.chunk_size,
        )))
    }
}

/// One open connection scoped to a schema.
///
/// The connection is closed when the source is dropped.
pub struct OracleSource {
    conn: Connection,
    schema: Option<String>,
    chunk_size: u32,
    selected: Option<Vec<String>>,
}

impl OracleSource {
    pub fn new(conn: Connection, schema: Option<String>, chunk_size: u32) -> Self {
        Self {
            conn,
            schema,
            chunk_size,
            selected: None,
        }
    }
}

impl SourcePort for OracleSource {
    fn list_resources(&self) -> Result<Vec<String>> {
        let rows = match &self.schema {
            Some(schema) => self.conn.query(SQL_LIST_TABLES, &[&schema.to_uppercase()])?,
            None => self.conn.query(SQL_LIST_USER_TABLES, &[])?,
        };
        let mut tables = Vec::new();
        for row_result in rows {
            let row = row_result?;
            let name: String = row.get(0)?;
            tables.push(name);
        }
        Ok(tables)
    }

    fn with_resources(&mut self, names: &[String]) -> Result<()> {
        let available = self.list_resources()?;
        if let Some(missing) = names.iter().find(|n| !available.contains(n)) {
            return Err(LoaderError::SourceError(format!(
                "Table {} is not available in schema {}",
                missing,
                self.schema.as_deref().unwrap_or("<default>")
            )));
        }
        self.selected = Some(names.to_vec());
        Ok(())
    }

    fn selected_resources(&self) -> Result<Vec<String>> {
        match &self.selected {
            Some(selected) => Ok(selected.clone()),
            None => self.list_resources(),
        }
    }

    fn stream_resource(&self, resource: &str, sink: &mut dyn RecordSink) -> Result<u64> {
        let sql = format!(
            "SELECT * FROM {}",
            qualified_table_name(self.schema.as_deref(), resource)
        );
        debug!("Extracting with: {}", sql);

        let mut stmt = self
            .conn
            .statement(&sql)
            .prefetch_rows(self.chunk_size)
            .fetch_array_size(self.chunk_size)
            .build()?;
        let rows = stmt.query(&[])?;

        let columns: Vec<(String, OracleType, &'static str)> = rows
            .column_info()
            .iter()
            .map(|c| {
                let otype = c.oracle_type().clone();
                let bq_type = map_oracle_to_bq(&otype, Some(&otype.to_string()));
                (c.name().to_string(), otype, bq_type)
            })
            .collect();

        let specs: Vec<ColumnSpec> = columns
            .iter()
            .map(|(name, _, bq_type)| ColumnSpec {
                name: name.clone(),
                bq_type: bq_type.to_string(),
            })
            .collect();
        sink.begin(&specs)?;

        let batch_size = self.chunk_size as usize;
        let mut batch: Vec<Record> = Vec::with_capacity(batch_size.min(10_000));
        let mut count = 0;

        for row_res in rows {
            let row = row_res?;
            let mut record = Record::new();
            for (i, (name, otype, bq_type)) in columns.iter().enumerate() {
                record.insert(name.clone(), column_value(&row, i, otype, bq_type)?);
            }
            batch.push(record);
            count += 1;

            if batch.len() >= batch_size {
                sink.write_batch(&batch)?;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            sink.write_batch(&batch)?;
        }

        Ok(count)
    }
}

/// `"SCHEMA"."TABLE"`, or just `"TABLE"` for the user's own schema.
pub fn qualified_table_name(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(s) => format!("{}.{}", quote_identifier(&s.to_uppercase()), quote_identifier(table)),
        None => quote_identifier(table),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Converts one column to the JSON shape BigQuery expects for `bq_type`.
fn column_value(row: &Row, i: usize, otype: &OracleType, bq_type: &str) -> Result<Value> {
    match otype {
        OracleType::Number(_, _)
        | OracleType::Int64
        | OracleType::Float(_)
        | OracleType::BinaryFloat
        | OracleType::BinaryDouble => {
            let v: Option<String> = row.get(i)?;
            Ok(v.map(|s| number_value(bq_type, s)).unwrap_or(Value::Null))
        }
        OracleType::Date
        | OracleType::Timestamp(_)
        | OracleType::TimestampTZ(_)
        | OracleType::TimestampLTZ(_) => {
            let v: Option<Timestamp> = row.get(i)?;
            Ok(v.map(|ts| Value::String(format_timestamp(&ts)))
                .unwrap_or(Value::Null))
        }
        OracleType::Raw(_) | OracleType::BLOB => {
            let v: Option<Vec<u8>> = row.get(i)?;
            Ok(v.map(|b| Value::String(general_purpose::STANDARD.encode(b)))
                .unwrap_or(Value::Null))
        }
        OracleType::Boolean => {
            let v: Option<bool> = row.get(i)?;
            Ok(v.map(Value::Bool).unwrap_or(Value::Null))
        }
        _ => {
            let v: Option<String> = row.get(i)?;
            Ok(v.map(|s| text_value(bq_type, s)).unwrap_or(Value::Null))
        }
    }
}

/// INT64 and FLOAT64 columns become JSON numbers. BIGNUMERIC stays a
/// decimal string so no precision is lost on the way to BigQuery.
fn number_value(bq_type: &str, text: String) -> Value {
    match bq_type {
        "INT64" => match text.parse::<i64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => Value::String(text),
        },
        "FLOAT64" => match text.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(n) => Value::Number(n),
            None => Value::String(text),
        },
        _ => Value::String(text),
    }
}

/// JSON columns carry the parsed document; everything else stays text.
fn text_value(bq_type: &str, text: String) -> Value {
    if bq_type == "JSON" {
        if let Ok(doc) = serde_json::from_str::<Value>(&text) {
            return doc;
        }
    }
    Value::String(text)
}

fn format_timestamp(ts: &Timestamp) -> String {
    let mut out = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}",
        ts.year(),
        ts.month(),
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second(),
        ts.nanosecond() / 1000
    );
    if ts.with_tz() {
        let sign = if ts.tz_hour_offset() < 0 || ts.tz_minute_offset() < 0 {
            '-'
        } else {
            '+'
        };
        out.push_str(&format!(
            "{}{:02}:{:02}",
            sign,
            ts.tz_hour_offset().abs(),
            ts.tz_minute_offset().abs()
        ));
    }
    out
}
