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

//! # Source Port
//!
//! This Port defines what it means to "extract tables" from a database.
//!
//! A `SourceConnector` builds a `SourcePort` from `SourceSettings`. The
//! orchestrator only ever lists, restricts, and hands the source over to a
//! loader; the loader is the one that streams rows out of it.

use crate::domain::entities::{ColumnSpec, SourceSettings};
use crate::domain::errors::Result;
use serde_json::{Map, Value};

/// A single extracted row: column name to JSON value.
pub type Record = Map<String, Value>;

/// Receives rows from a source, one batch at a time.
pub trait RecordSink {
    /// Called once per resource, before any batch and even when the table is empty.
    fn begin(&mut self, columns: &[ColumnSpec]) -> Result<()>;

    /// Called with at most `chunk_size` rows per call.
    fn write_batch(&mut self, batch: &[Record]) -> Result<()>;
}

/// Opens extraction sources.
pub trait SourceConnector: Send + Sync {
    fn connect(&self, settings: &SourceSettings) -> Result<Box<dyn SourcePort>>;
}

/// An open extraction source over one schema.
pub trait SourcePort {
    /// Every table the schema exposes, in the order the database returns them.
    fn list_resources(&self) -> Result<Vec<String>>;

    /// Restricts the source to exactly `names`. Unknown names are an error.
    fn with_resources(&mut self, names: &[String]) -> Result<()>;

    /// The tables a loader will extract. All of them until `with_resources` is called.
    fn selected_resources(&self) -> Result<Vec<String>>;

    /// Reports the columns of `resource` to `sink`, then streams every row
    /// into it. Returns the row count.
    fn stream_resource(&self, resource: &str, sink: &mut dyn RecordSink) -> Result<u64>;
}
