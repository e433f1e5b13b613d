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

//! Oracle Instant Client ("thick mode") initialization.
//!
//! Must run before the first connection is opened. Older servers (< 12.1)
//! can only be reached this way.

use crate::domain::errors::{LoaderError, Result};
use log::info;
use oracle::InitParams;

/// Loads the Oracle client library, optionally from `lib_dir`.
pub fn init_thick_mode(lib_dir: Option<&str>) -> Result<()> {
    let mut params = InitParams::new();
    if let Some(dir) = lib_dir {
        params
            .oracle_client_lib_dir(dir)
            .map_err(|e| LoaderError::ClientInitError(e.to_string()))?;
    }

    let initialized = params
        .init()
        .map_err(|e| LoaderError::ClientInitError(e.to_string()))?;

    if initialized {
        info!(
            "Oracle thick mode enabled (Instant Client from {})",
            lib_dir.unwrap_or("default library path")
        );
    } else {
        info!("Oracle client was already initialized; thick mode settings left unchanged");
    }
    Ok(())
}
