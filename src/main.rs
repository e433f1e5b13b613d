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

//! Entry point: configure from the environment, run once, exit.
//!
//! Exit status is 0 on success or when no table matched the filters, and 1
//! on any configuration, client initialization, extraction or load failure.

use clap::Parser;
use db_to_bq::application::orchestrator::Orchestrator;
use db_to_bq::application::runtime::{init_logging, RuntimeContext};
use db_to_bq::config::{parse_log_level, AppConfig, CliArgs};
use db_to_bq::domain::entities::RunOutcome;
use db_to_bq::infrastructure::bigquery::bq_loader_adapter::BigQueryLoaderAdapter;
use db_to_bq::infrastructure::gcp::secret_manager_adapter::SecretManagerAdapter;
use db_to_bq::infrastructure::oracle::oracle_source_adapter::OracleConnector;
use log::{error, info, warn};
use std::process;
use std::sync::Arc;

fn main() {
    // 1. Parse arguments / environment
    let args = CliArgs::parse();

    // 2. Initialize logging
    init_logging(parse_log_level(args.log_level.as_deref()), args.log_format);

    // 3. Validate config before anything touches the outside world
    let config = match AppConfig::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    // 4. Oracle client (thick mode)
    let runtime = match RuntimeContext::init(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to enable Oracle thick mode: {}", e);
            process::exit(1);
        }
    };
    info!("Runtime ready (oracle thick mode: {})", runtime.thick_mode);

    // 5. Wire adapters
    let secret_port = Arc::new(SecretManagerAdapter::new(
        config.destination.project_id.clone(),
    ));
    let source_connector = Arc::new(OracleConnector::new());
    let loader_port = Arc::new(BigQueryLoaderAdapter::new(
        config.pipeline_name.clone(),
        config.destination.clone(),
        config.staging_dir.clone(),
    ));

    let orchestrator = Orchestrator::new(secret_port, source_connector, loader_port, config);

    // 6. Run
    match orchestrator.run() {
        Ok(RunOutcome::Loaded(load_info)) => {
            info!("Run finished. {} tables loaded.", load_info.tables.len());
            match serde_json::to_string(&load_info) {
                Ok(json) => info!("Load info: {}", json),
                Err(e) => warn!("Could not serialize load info: {}", e),
            }
        }
        Ok(RunOutcome::NothingSelected) => {
            info!("Run finished without loading anything.");
        }
        Err(e) => {
            error!("Pipeline run failed: {} ({:?})", e, e);
            process::exit(1);
        }
    }
}
