// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One bootstrap invocation: locate the cluster, assemble credentials and
//! issue the mutating call selected by the mode.

use crate::aws::{ClusterLocator, TokenIssuer};
use crate::config::Mode;
use crate::credentials::build_credentials;
use crate::error::Result;
use crate::kubernetes::{apply, ClusterConnector};
use crate::types::{AuthRequest, DemoWorkload, MutationPayload, Outcome};
use tracing::{info, instrument};

/// Collaborators and settings shared by all invocations of a process.
/// Holds no per-invocation state; credentials live only inside `run`.
pub struct Bootstrapper {
    locator: Box<dyn ClusterLocator>,
    issuer: Box<dyn TokenIssuer>,
    connector: Box<dyn ClusterConnector>,
    mode: Mode,
    workload: DemoWorkload,
}

impl Bootstrapper {
    pub fn new(
        locator: Box<dyn ClusterLocator>,
        issuer: Box<dyn TokenIssuer>,
        connector: Box<dyn ClusterConnector>,
        mode: Mode,
    ) -> Self {
        Self {
            locator,
            issuer,
            connector,
            mode,
            workload: DemoWorkload::default(),
        }
    }

    /// Replace the demo workload used in deployment mode
    pub fn with_workload(mut self, workload: DemoWorkload) -> Self {
        self.workload = workload;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[instrument(skip(self, request), fields(cluster = %request.cluster_id(), mode = %self.mode))]
    pub async fn run(&self, request: &AuthRequest) -> Result<Outcome> {
        request.validate(self.mode)?;

        let descriptor = self.locator.locate(request.cluster_id()).await?;
        let credentials =
            build_credentials(&descriptor, request.role_arn(), self.issuer.as_ref()).await?;
        let client = self.connector.connect(&descriptor, &credentials)?;
        let payload = MutationPayload::for_mode(self.mode, request, &self.workload)?;

        let outcome = apply(&client, &descriptor, &credentials, &payload).await?;
        info!(
            "Bootstrap of cluster {} finished: {}",
            descriptor.name(),
            if outcome.is_success() { "success" } else { "failure" }
        );
        Ok(outcome)
    }

    /// Like `run`, but a failed outcome becomes the matching error
    pub async fn invoke(&self, request: &AuthRequest) -> Result<Outcome> {
        let outcome = self.run(request).await?;
        outcome.clone().into_result()?;
        Ok(outcome)
    }
}
