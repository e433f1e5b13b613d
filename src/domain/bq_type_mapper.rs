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

//! Maps Oracle column types to the BigQuery types used in load schemas.
//!
//! The type chosen here also decides how a value is written into the load
//! file (see `oracle_source_adapter::column_value`), so the two must agree.

use oracle::sql_type::OracleType;

/// Widest NUMBER(p, 0) that always fits an INT64.
pub const MAX_INT64_PRECISION: u8 = 18;

/// Maps an Oracle type (and its declared type name, for object types such
/// as XMLTYPE) to a BigQuery column type.
pub fn map_oracle_to_bq(oracle_type: &OracleType, raw_type: Option<&str>) -> &'static str {
    if let Some(r) = raw_type {
        let upper = r.to_uppercase();
        if upper.contains("XMLTYPE") || upper.contains("SDO_GEOMETRY") || upper.contains("UROWID") {
            return "STRING";
        }
        if upper.contains("JSON") {
            return "JSON";
        }
        if upper.contains("BOOLEAN") {
            return "BOOL";
        }
    }

    match oracle_type {
        OracleType::Number(precision, scale) => {
            if *scale == 0 && *precision > 0 && *precision <= MAX_INT64_PRECISION {
                "INT64"
            } else if *scale == -127 && *precision > 0 {
                "FLOAT64"
            } else {
                "BIGNUMERIC"
            }
        }
        OracleType::Int64 => "INT64",
        OracleType::Float(_) | OracleType::BinaryFloat | OracleType::BinaryDouble => "FLOAT64",
        OracleType::Date | OracleType::Timestamp(_) => "DATETIME",
        OracleType::TimestampTZ(_) | OracleType::TimestampLTZ(_) => "TIMESTAMP",
        OracleType::Boolean => "BOOL",
        OracleType::Raw(_) | OracleType::BLOB => "BYTES",
        // Intervals are extracted as Oracle literals ("+01-02"), which BigQuery
        // INTERVAL does not parse.
        _ => "STRING",
    }
}
