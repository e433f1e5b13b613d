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

//! # db-to-bq
//!
//! Loads every table of a relational schema (Oracle first) into a BigQuery
//! dataset, replacing the previous contents of each destination table.
//!
//! The crate follows the **Hexagonal Architecture** (Ports and Adapters):
//! the table filters and the orchestrator only see the traits in `ports`,
//! and the Oracle, Secret Manager and BigQuery specifics live in
//! `infrastructure`.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;
