// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use lambda_runtime::{service_fn, LambdaEvent};
use tracing::info;
use tracing_subscriber::EnvFilter;

use eks_bootstrap::aws::{
    load_sdk_config, EksClusterLocator, StaticTokenIssuer, StsTokenIssuer, TokenIssuer,
};
use eks_bootstrap::bootstrap::Bootstrapper;
use eks_bootstrap::cli::CliArgs;
use eks_bootstrap::config::Config;
use eks_bootstrap::kubernetes::PinnedTlsConnector;
use eks_bootstrap::types::AuthRequest;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    // Load configuration
    let config = Config::from_env()?;
    let mode = args.mode.unwrap_or(config.mode);
    info!("Configuration loaded: mode={}, max_attempts={}", mode, config.max_attempts);

    let profile = args.local.then_some(args.profile.as_str());
    let sdk_config = load_sdk_config(profile, args.region.as_deref()).await;

    let issuer: Box<dyn TokenIssuer> = match &config.static_token {
        Some(token) => {
            info!("Using pre-issued bearer token from EKS_BEARER_TOKEN");
            Box::new(StaticTokenIssuer::new(token.clone()))
        }
        None => Box::new(StsTokenIssuer::new(
            &sdk_config,
            config.max_attempts,
            &config.role_session_name,
        )),
    };

    let bootstrapper = Bootstrapper::new(
        Box::new(EksClusterLocator::new(&sdk_config, config.max_attempts)),
        issuer,
        Box::new(PinnedTlsConnector),
        mode,
    );

    if args.local {
        info!("Running locally...");
        let request = args.auth_request();
        bootstrapper
            .invoke(&request)
            .await
            .with_context(|| format!("Bootstrap of cluster '{}' failed", request.cluster_id()))?;
        info!("Bootstrap of cluster '{}' succeeded", request.cluster_id());
        return Ok(());
    }

    info!("Waiting for invocations in {} mode", bootstrapper.mode());
    let bootstrapper = &bootstrapper;
    // Events without a clusterId target EKS_CLUSTER_NAME
    let default_cluster = args.cluster_id.as_deref();
    lambda_runtime::run(service_fn(move |event: LambdaEvent<AuthRequest>| async move {
        let request = event.payload.or_cluster_id(default_cluster);
        bootstrapper
            .invoke(&request)
            .await
            .map_err(lambda_runtime::Error::from)
    }))
    .await
    .map_err(|e| anyhow!(e))
}
