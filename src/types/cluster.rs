// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{BootstrapError, Result};
use http::Uri;

/// Connection details of a managed cluster, as returned by the cluster API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterDescriptor {
    name: String,
    endpoint: Uri,
    /// Base64-encoded PEM bundle, exactly as stored by the cluster API
    certificate_authority: String,
}

impl ClusterDescriptor {
    /// Build a descriptor, rejecting endpoints that are not absolute https URLs
    pub fn new(
        name: impl Into<String>,
        endpoint: &str,
        certificate_authority: impl Into<String>,
    ) -> Result<Self> {
        let endpoint: Uri = endpoint
            .trim()
            .parse()
            .map_err(|e| BootstrapError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        if endpoint.scheme_str() != Some("https") {
            return Err(BootstrapError::InvalidEndpoint(format!(
                "{}: expected an https URL",
                endpoint
            )));
        }
        if endpoint.host().map_or(true, str::is_empty) {
            return Err(BootstrapError::InvalidEndpoint(format!(
                "{}: missing host",
                endpoint
            )));
        }

        Ok(ClusterDescriptor {
            name: name.into(),
            endpoint,
            certificate_authority: certificate_authority.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    pub fn certificate_authority(&self) -> &str {
        &self.certificate_authority
    }

    /// Absolute URL for an API path on this cluster
    pub fn url_for(&self, path: &str) -> Result<Uri> {
        let base = self.endpoint.to_string();
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
            .parse()
            .map_err(|e| BootstrapError::InvalidEndpoint(format!("{}{}: {}", base, path, e)))
    }
}
