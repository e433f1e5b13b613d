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

//! # Secret Port
//!
//! The connection string never lives in the environment: only a reference
//! to it does. This Port is the contract for turning that reference into
//! the secret's raw bytes.

use crate::domain::errors::Result;

/// `SecretPort` resolves a secret reference to its payload.
pub trait SecretPort: Send + Sync {
    /// Returns the raw bytes stored under `reference`.
    fn access_secret(&self, reference: &str) -> Result<Vec<u8>>;
}
