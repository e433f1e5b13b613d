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

//! Connection URL normalization.
//!
//! Thin-mode Oracle clients running in containers hang on out-of-band break
//! signals, so unless the native client is in use we ask the driver to
//! disable them.

/// Substring identifying an Oracle connection URL (`oracle://`, `oracle+oracledb://`).
pub const ORACLE_FAMILY_MARKER: &str = "oracle";

/// Parameter appended to Oracle URLs in thin mode.
pub const DISABLE_OOB_PARAM: &str = "disable_oob=true";

/// Appends `disable_oob=true` to an Oracle URL when thick mode is off.
///
/// Any other URL, or one that already carries the parameter, is returned
/// unchanged, so applying this twice is the same as applying it once.
pub fn normalize_connection_url(url: &str, thick_mode: bool) -> String {
    if thick_mode || !url.contains(ORACLE_FAMILY_MARKER) || url.contains(DISABLE_OOB_PARAM) {
        return url.to_string();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, DISABLE_OOB_PARAM)
}
