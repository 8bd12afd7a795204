// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::config::Mode;
use crate::types::AuthRequest;
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Bootstrap access to an EKS cluster", long_about = None)]
pub struct CliArgs {
    /// Run once locally with the flag-supplied input instead of waiting for invocations
    #[clap(short, long)]
    pub local: bool,

    /// Name of the EKS cluster
    #[clap(short, long, env = "EKS_CLUSTER_NAME")]
    pub cluster_id: Option<String>,

    /// IAM role of the worker nodes to map into the cluster (aws-auth mode)
    #[clap(short, long)]
    pub node_role_arn: Option<String>,

    /// Role to assume when requesting the cluster token
    #[clap(short, long)]
    pub role_arn: Option<String>,

    /// Action to perform against the cluster; overrides BOOTSTRAP_MODE
    #[clap(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// AWS profile to use for local runs
    #[clap(short, long, default_value = "default")]
    pub profile: String,

    /// AWS region of the cluster; defaults to the shared configuration
    #[clap(long, env = "AWS_REGION")]
    pub region: Option<String>,
}

impl CliArgs {
    /// Invocation input for a local run
    pub fn auth_request(&self) -> AuthRequest {
        AuthRequest {
            cluster_id: self.cluster_id.clone().unwrap_or_default(),
            node_role_arn: self.node_role_arn.clone(),
            role_arn: self.role_arn.clone(),
        }
    }
}
