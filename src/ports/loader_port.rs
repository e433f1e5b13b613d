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

//! # Loader Port
//!
//! The contract for the warehouse side: take a (restricted) source and
//! land every one of its tables in the destination dataset.

use crate::domain::entities::{LoadInfo, WriteDisposition};
use crate::domain::errors::Result;
use crate::ports::source_port::SourcePort;

/// `LoaderPort` runs the actual extract-and-load.
pub trait LoaderPort: Send + Sync {
    /// Loads every selected resource of `source`. Fails on the first table that fails.
    fn run(&self, source: &dyn SourcePort, disposition: WriteDisposition) -> Result<LoadInfo>;
}
