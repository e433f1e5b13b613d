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

//! Core error definitions for the loader.
//!
//! This module provides a centralized `LoaderError` enum and a `Result` type
//! used throughout the application to handle configuration, secret, Oracle,
//! I/O and BigQuery failures.

use thiserror::Error;

/// Error types encountered during a load run.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Secret resolution failed: {0}")]
    SecretError(String),

    #[error("Oracle client initialization failed: {0}")]
    ClientInitError(String),

    #[error("Source error: {0}")]
    SourceError(String),

    #[error("Load failed for {table}: {reason}")]
    LoadError { table: String, reason: String },

    #[error("Oracle error: {0}")]
    OracleError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<oracle::Error> for LoaderError {
    fn from(e: oracle::Error) -> Self {
        LoaderError::OracleError(e.to_string())
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(e: serde_json::Error) -> Self {
        LoaderError::SerializationError(e.to_string())
    }
}

/// A specialized Result type for the loader.
pub type Result<T> = std::result::Result<T, LoaderError>;
