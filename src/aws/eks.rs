// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster lookup through the EKS API

use crate::error::{BootstrapError, Result};
use crate::types::ClusterDescriptor;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_eks::config::retry::RetryConfig;
use aws_sdk_eks::error::{DisplayErrorContext, SdkError};
use aws_sdk_eks::operation::describe_cluster::DescribeClusterError;
use aws_sdk_eks::types::Cluster;
use tracing::{info, instrument};

/// Resolves a cluster id to its endpoint and CA bundle
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterLocator: Send + Sync {
    async fn locate(&self, cluster_id: &str) -> Result<ClusterDescriptor>;
}

pub struct EksClusterLocator {
    client: aws_sdk_eks::Client,
}

impl EksClusterLocator {
    pub fn new(sdk_config: &SdkConfig, max_attempts: u32) -> Self {
        let client = aws_sdk_eks::Client::from_conf(
            aws_sdk_eks::config::Builder::from(sdk_config)
                .retry_config(RetryConfig::standard().with_max_attempts(max_attempts))
                .build(),
        );
        Self { client }
    }
}

#[async_trait]
impl ClusterLocator for EksClusterLocator {
    #[instrument(skip(self))]
    async fn locate(&self, cluster_id: &str) -> Result<ClusterDescriptor> {
        let response = self
            .client
            .describe_cluster()
            .name(cluster_id)
            .send()
            .await
            .map_err(|err| describe_error(cluster_id, err))?;

        let Some(cluster) = response.cluster() else {
            return Err(BootstrapError::NotFound {
                cluster_id: cluster_id.to_string(),
            });
        };

        let descriptor = descriptor_from_cluster(cluster_id, cluster)?;
        info!(
            "Located cluster {} at {}",
            descriptor.name(),
            descriptor.endpoint()
        );
        Ok(descriptor)
    }
}

/// An unknown cluster is `NotFound`, any other DescribeCluster failure `TransientApi`
pub fn describe_error<R>(cluster_id: &str, err: SdkError<DescribeClusterError, R>) -> BootstrapError
where
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let err = err.into_service_error();
    if err.is_resource_not_found_exception() {
        BootstrapError::NotFound {
            cluster_id: cluster_id.to_string(),
        }
    } else {
        BootstrapError::TransientApi(format!(
            "Failed to describe cluster {}: {}",
            cluster_id,
            DisplayErrorContext(&err)
        ))
    }
}

/// Extract connection details from a described cluster
pub fn descriptor_from_cluster(cluster_id: &str, cluster: &Cluster) -> Result<ClusterDescriptor> {
    let Some(endpoint) = cluster.endpoint() else {
        return Err(BootstrapError::ClusterNotReady(format!(
            "Cluster {} has no endpoint yet",
            cluster_id
        )));
    };

    let Some(ca_data) = cluster
        .certificate_authority()
        .and_then(|ca| ca.data())
        .filter(|data| !data.is_empty())
    else {
        return Err(BootstrapError::ClusterNotReady(format!(
            "Cluster {} has no certificate authority data yet",
            cluster_id
        )));
    };

    ClusterDescriptor::new(cluster_id, endpoint, ca_data)
}
