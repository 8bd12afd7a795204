// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Cluster {cluster_id} not found")]
    NotFound { cluster_id: String },

    #[error("Cluster not ready: {0}")]
    ClusterNotReady(String),

    #[error("Invalid cluster endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Malformed certificate authority: {0}")]
    MalformedCertificate(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Transient API error: {0}")]
    TransientApi(String),

    #[error("Failed to configure cluster client: {0}")]
    ClientConfig(String),

    #[error("Failed to build payload: {0}")]
    Payload(String),

    #[error("Resource already exists: {body}")]
    Conflict { body: String },

    #[error("Unexpected HTTP status {status_code}: {body}")]
    UnexpectedStatus { status_code: u16, body: String },
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
