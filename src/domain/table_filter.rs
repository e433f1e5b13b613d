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

//! # Table Selection
//!
//! Decides which of the tables a source exposes actually get loaded.
//!
//! Stages run in a fixed order, each one on the output of the previous:
//! 1. Recycle-bin artifacts (`BIN$...`) are always dropped.
//! 2. Include list (if configured): keep exact, case-insensitive matches.
//! 3. Exclude list (if configured): drop exact, case-insensitive matches.
//! 4. Prefix (if configured): keep names starting with it, case-insensitively.
//!
//! The input order is preserved and names keep their original case.

use std::collections::HashSet;

/// Oracle moves dropped tables to the recycle bin under this prefix.
pub const SYSTEM_TABLE_MARKER: &str = "BIN$";

/// Filters parsed once from their raw comma-separated configuration strings.
///
/// Every entry is already trimmed and lower-cased, so matching is a plain
/// lookup against the lower-cased table name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFilters {
    pub include: Option<HashSet<String>>,
    pub exclude: Option<HashSet<String>>,
    pub prefix: Option<String>,
}

/// Result of running the filter pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSelection {
    Selected(Vec<String>),
    /// Every table was filtered out. The caller skips the load.
    NothingSelected,
}

impl TableFilters {
    /// Parses the raw `TABLES_INCLUDE` / `TABLES_EXCLUDE` / `TABLES_PREFIX` values.
    ///
    /// Only an absent or empty value disables its stage. A whitespace-only
    /// include list parses to a single empty name and so matches nothing.
    pub fn parse(include: Option<&str>, exclude: Option<&str>, prefix: Option<&str>) -> Self {
        Self {
            include: parse_name_list(include),
            exclude: parse_name_list(exclude),
            prefix: prefix
                .filter(|p| !p.is_empty())
                .map(|p| p.trim().to_lowercase()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_none() && self.prefix.is_none()
    }
}

fn parse_name_list(raw: Option<&str>) -> Option<HashSet<String>> {
    let raw = raw.filter(|r| !r.is_empty())?;
    Some(raw.split(',').map(|t| t.trim().to_lowercase()).collect())
}

/// Returns true for Oracle recycle-bin tables.
pub fn is_system_table(name: &str) -> bool {
    name.to_uppercase().starts_with(SYSTEM_TABLE_MARKER)
}

/// Runs the full filter pipeline over `all_tables`.
pub fn select_tables(all_tables: &[String], filters: &TableFilters) -> TableSelection {
    let mut selected: Vec<String> = all_tables
        .iter()
        .filter(|n| !is_system_table(n))
        .cloned()
        .collect();

    if let Some(include) = &filters.include {
        selected.retain(|n| include.contains(&n.to_lowercase()));
    }

    if let Some(exclude) = &filters.exclude {
        selected.retain(|n| !exclude.contains(&n.to_lowercase()));
    }

    if let Some(prefix) = &filters.prefix {
        selected.retain(|n| n.to_lowercase().starts_with(prefix.as_str()));
    }

    if selected.is_empty() {
        TableSelection::NothingSelected
    } else {
        TableSelection::Selected(selected)
    }
}
