// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::config::Mode;
use crate::error::{BootstrapError, Result};
use serde::Deserialize;

/// Invocation input, either from a handler event or from the command line
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// May be left out of an event; see `or_cluster_id`
    #[serde(default, alias = "clusterid")]
    pub cluster_id: String,
    /// IAM role of the worker nodes to map into the cluster
    #[serde(default, alias = "noderolearn")]
    pub node_role_arn: Option<String>,
    /// Role to assume when requesting the bearer token
    #[serde(default, alias = "rolearn")]
    pub role_arn: Option<String>,
}

impl AuthRequest {
    pub fn new(cluster_id: impl Into<String>) -> Self {
        AuthRequest {
            cluster_id: cluster_id.into(),
            ..Default::default()
        }
    }

    pub fn with_node_role_arn(mut self, arn: impl Into<String>) -> Self {
        self.node_role_arn = Some(arn.into());
        self
    }

    pub fn with_role_arn(mut self, arn: impl Into<String>) -> Self {
        self.role_arn = Some(arn.into());
        self
    }

    /// Fill in the cluster when the request names none
    pub fn or_cluster_id(mut self, fallback: Option<&str>) -> Self {
        if self.cluster_id().is_empty() {
            if let Some(fallback) = fallback {
                self.cluster_id = fallback.trim().to_string();
            }
        }
        self
    }

    pub fn cluster_id(&self) -> &str {
        self.cluster_id.trim()
    }

    pub fn node_role_arn(&self) -> Option<&str> {
        non_empty(&self.node_role_arn)
    }

    pub fn role_arn(&self) -> Option<&str> {
        non_empty(&self.role_arn)
    }

    /// Check the request carries everything the given mode needs
    pub fn validate(&self, mode: Mode) -> Result<()> {
        if self.cluster_id().is_empty() {
            return Err(BootstrapError::InvalidRequest(
                "clusterId must not be empty".to_string(),
            ));
        }

        if mode == Mode::AwsAuth && self.node_role_arn().is_none() {
            return Err(BootstrapError::InvalidRequest(
                "nodeRoleArn is required in aws-auth mode".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
