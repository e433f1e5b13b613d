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

//! The core application logic that drives one load run.
//!
//! resolve secret → normalize URL → open source → list tables → filter →
//! restrict source → load with replace semantics.

use crate::config::AppConfig;
use crate::domain::connection_url::normalize_connection_url;
use crate::domain::entities::{RunOutcome, SourceSettings, WriteDisposition};
use crate::domain::errors::{LoaderError, Result};
use crate::domain::table_filter::{select_tables, TableSelection};
use crate::ports::loader_port::LoaderPort;
use crate::ports::secret_port::SecretPort;
use crate::ports::source_port::SourceConnector;
use log::{debug, info, warn};
use std::sync::Arc;

/// Orchestrates a full extract-and-load of one schema into one dataset.
pub struct Orchestrator {
    secret_port: Arc<dyn SecretPort>,
    source_connector: Arc<dyn SourceConnector>,
    loader_port: Arc<dyn LoaderPort>,
    config: AppConfig,
}

impl Orchestrator {
    pub fn new(
        secret_port: Arc<dyn SecretPort>,
        source_connector: Arc<dyn SourceConnector>,
        loader_port: Arc<dyn LoaderPort>,
        config: AppConfig,
    ) -> Self {
        Self {
            secret_port,
            source_connector,
            loader_port,
            config,
        }
    }

    /// Runs the pipeline once.
    ///
    /// Returns `RunOutcome::NothingSelected` without touching the loader when
    /// the filters leave no table.
    pub fn run(&self) -> Result<RunOutcome> {
        let db_url = self.resolve_connection_url()?;

        info!(
            "Starting pipeline {} to BigQuery (dataset: {})",
            self.config.pipeline_name, self.config.destination.dataset_id
        );

        let settings = SourceSettings {
            connection_url: normalize_connection_url(&db_url, self.config.thick_mode),
            schema: self.config.db_schema.clone(),
            chunk_size: self.config.chunk_size,
        };
        let mut source = self.source_connector.connect(&settings)?;

        let all_tables = source.list_resources()?;
        debug!(
            "Schema {} exposes {} tables",
            settings.schema.as_deref().unwrap_or("<default>"),
            all_tables.len()
        );

        let selected = match select_tables(&all_tables, &self.config.filters) {
            TableSelection::Selected(selected) => selected,
            TableSelection::NothingSelected => {
                warn!("No table matches the configured filters.");
                return Ok(RunOutcome::NothingSelected);
            }
        };

        source.with_resources(&selected)?;
        info!("Resources ready for transfer: {:?}", selected);

        let load_info = self
            .loader_port
            .run(source.as_ref(), WriteDisposition::Replace)?;
        info!("Pipeline completed successfully. Info: {}", load_info);

        Ok(RunOutcome::Loaded(load_info))
    }

    fn resolve_connection_url(&self) -> Result<String> {
        let payload = self.secret_port.access_secret(&self.config.db_url_secret)?;
        let url = String::from_utf8(payload)
            .map_err(|_| LoaderError::SecretError("Secret payload is not valid UTF-8".to_string()))?;
        let url = url.trim();
        if url.is_empty() {
            return Err(LoaderError::ConfigError(
                "The database connection URL is required but the secret is empty".to_string(),
            ));
        }
        Ok(url.to_string())
    }
}
