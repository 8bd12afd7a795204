// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from assembled credentials

use crate::credentials::Credentials;
use crate::error::{BootstrapError, Result};
use crate::types::ClusterDescriptor;
use kube::{config::AuthInfo, Client, Config as KConfig};
use tracing::{debug, instrument};

/// Turns a descriptor plus credentials into a client for that cluster
pub trait ClusterConnector: Send + Sync {
    fn connect(&self, descriptor: &ClusterDescriptor, credentials: &Credentials) -> Result<Client>;
}

/// Connects over TLS trusting only the cluster's own CA
#[derive(Debug, Default, Clone, Copy)]
pub struct PinnedTlsConnector;

impl ClusterConnector for PinnedTlsConnector {
    #[instrument(skip_all, fields(cluster = %descriptor.name()))]
    fn connect(&self, descriptor: &ClusterDescriptor, credentials: &Credentials) -> Result<Client> {
        let config = cluster_config(descriptor, credentials);
        debug!("Creating client for {}", descriptor.endpoint());

        Client::try_from(config).map_err(|e| {
            BootstrapError::ClientConfig(format!(
                "Failed to create client for cluster {}: {}",
                descriptor.name(),
                e
            ))
        })
    }
}

/// Client configuration pinned to the cluster CA with bearer authentication.
/// Setting `root_cert` replaces the system trust store entirely.
pub fn cluster_config(descriptor: &ClusterDescriptor, credentials: &Credentials) -> KConfig {
    let mut config = KConfig::new(descriptor.endpoint().clone());
    config.root_cert = Some(credentials.trust_store.certificates().to_vec());
    config.accept_invalid_certs = false;
    config.auth_info = AuthInfo {
        token: Some(credentials.token.secret().clone()),
        ..Default::default()
    };
    config
}
