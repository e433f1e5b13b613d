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

//! Configuration failures must stop the binary with status 1 before any
//! secret, database or BigQuery call is made.

use assert_cmd::Command;
use predicates::prelude::*;

const VARS: &[&str] = &[
    "DB_URL_SECRET",
    "BQ_DATASET_ID",
    "DB_SCHEMA",
    "GOOGLE_CLOUD_PROJECT",
    "BQ_LOCATION",
    "TABLES_INCLUDE",
    "TABLES_EXCLUDE",
    "TABLES_PREFIX",
    "SQL_CHUNK_SIZE",
    "ENABLE_ORACLE_THICK_MODE",
    "ORACLE_IC_PATH",
    "LOG_LEVEL",
    "LOG_FORMAT",
    "PIPELINE_NAME",
    "STAGING_DIR",
];

fn loader() -> Command {
    let mut cmd = Command::cargo_bin("db-to-bq").unwrap();
    for var in VARS {
        cmd.env_remove(var);
    }
    cmd.env("LOG_FORMAT", "text");
    cmd
}

#[test]
fn test_missing_secret_reference_exits_1() {
    loader()
        .env("BQ_DATASET_ID", "raw_erp")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DB_URL_SECRET is required"));
}

#[test]
fn test_blank_dataset_exits_1() {
    loader()
        .env("DB_URL_SECRET", "projects/p/secrets/db")
        .env("BQ_DATASET_ID", "   ")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("BQ_DATASET_ID is required"));
}

#[test]
fn test_invalid_chunk_size_exits_1() {
    loader()
        .env("DB_URL_SECRET", "projects/p/secrets/db")
        .env("BQ_DATASET_ID", "raw_erp")
        .env("SQL_CHUNK_SIZE", "ten")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("SQL_CHUNK_SIZE"));
}

#[test]
fn test_json_logs_by_default() {
    loader()
        .env_remove("LOG_FORMAT")
        .env("BQ_DATASET_ID", "raw_erp")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\"severity\":\"ERROR\""));
}
