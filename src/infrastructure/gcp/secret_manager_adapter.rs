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

//! Secret Manager access through the `gcloud` CLI.
//!
//! The CLI picks up whatever credentials the runtime provides (metadata
//! server on Cloud Run, `gcloud auth` locally).

use crate::domain::errors::{LoaderError, Result};
use crate::ports::secret_port::SecretPort;
use log::info;
use std::process::Command;

const LATEST_VERSION: &str = "latest";

/// A parsed secret version reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretVersionRef {
    pub project: Option<String>,
    pub secret: String,
    pub version: String,
}

impl SecretVersionRef {
    /// Accepts `projects/{p}/secrets/{s}/versions/{v}`, `projects/{p}/secrets/{s}`
    /// or a bare secret name. `default_project` fills in for bare names.
    pub fn parse(reference: &str, default_project: Option<&str>) -> Result<Self> {
        let reference = reference.trim();
        let parts: Vec<&str> = reference.split('/').collect();

        match parts.as_slice() {
            ["projects", project, "secrets", secret, "versions", version]
                if !project.is_empty() && !secret.is_empty() && !version.is_empty() =>
            {
                Ok(Self {
                    project: Some(project.to_string()),
                    secret: secret.to_string(),
                    version: version.to_string(),
                })
            }
            ["projects", project, "secrets", secret]
                if !project.is_empty() && !secret.is_empty() =>
            {
                Ok(Self {
                    project: Some(project.to_string()),
                    secret: secret.to_string(),
                    version: LATEST_VERSION.to_string(),
                })
            }
            [secret] if !secret.is_empty() => Ok(Self {
                project: default_project.map(str::to_string),
                secret: secret.to_string(),
                version: LATEST_VERSION.to_string(),
            }),
            _ => Err(LoaderError::SecretError(format!(
                "Malformed secret reference '{}'",
                reference
            ))),
        }
    }

    /// Arguments for `gcloud secrets versions access`.
    pub fn gcloud_args(&self) -> Vec<String> {
        let mut args = vec![
            "secrets".to_string(),
            "versions".to_string(),
            "access".to_string(),
            self.version.clone(),
            format!("--secret={}", self.secret),
        ];
        if let Some(project) = &self.project {
            args.push(format!("--project={}", project));
        }
        args
    }
}

/// `SecretPort` backed by `gcloud secrets versions access`.
pub struct SecretManagerAdapter {
    default_project: Option<String>,
}

impl SecretManagerAdapter {
    pub fn new(default_project: Option<String>) -> Self {
        Self { default_project }
    }
}

impl SecretPort for SecretManagerAdapter {
    fn access_secret(&self, reference: &str) -> Result<Vec<u8>> {
        let secret_ref = SecretVersionRef::parse(reference, self.default_project.as_deref())?;
        info!(
            "Resolving secret {} (version {})",
            secret_ref.secret, secret_ref.version
        );

        let output = Command::new("gcloud")
            .args(secret_ref.gcloud_args())
            .output()
            .map_err(|e| LoaderError::SecretError(format!("Failed to run gcloud: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LoaderError::SecretError(format!(
                "Access to secret {} failed: {}",
                secret_ref.secret,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version_path() {
        let r = SecretVersionRef::parse("projects/acme/secrets/erp-db-url/versions/3", None).unwrap();
        assert_eq!(r.project.as_deref(), Some("acme"));
        assert_eq!(r.secret, "erp-db-url");
        assert_eq!(r.version, "3");
        assert_eq!(
            r.gcloud_args(),
            vec![
                "secrets",
                "versions",
                "access",
                "3",
                "--secret=erp-db-url",
                "--project=acme"
            ]
        );
    }

    #[test]
    fn test_parse_secret_path_defaults_to_latest() {
        let r = SecretVersionRef::parse("projects/acme/secrets/erp-db-url", None).unwrap();
        assert_eq!(r.version, "latest");
    }

    #[test]
    fn test_parse_bare_name_uses_default_project() {
        let r = SecretVersionRef::parse(" erp-db-url ", Some("acme")).unwrap();
        assert_eq!(r.project.as_deref(), Some("acme"));
        assert_eq!(r.secret, "erp-db-url");

        let r = SecretVersionRef::parse("erp-db-url", None).unwrap();
        assert!(r.project.is_none());
        assert!(!r.gcloud_args().iter().any(|a| a.starts_with("--project")));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(SecretVersionRef::parse("", None).is_err());
        assert!(SecretVersionRef::parse("projects//secrets/x", None).is_err());
        assert!(SecretVersionRef::parse("projects/p/other/x", None).is_err());
    }
}
