// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The single mutating call against the cluster control plane

use crate::constants::aws_auth;
use crate::credentials::Credentials;
use crate::error::{BootstrapError, Result};
use crate::types::{ClusterDescriptor, MutationPayload, Outcome};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method, Request, StatusCode};
use http_body_util::BodyExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{api::PostParams, client::Body, Api, Client, ResourceExt};
use tracing::{info, instrument, warn};

/// Path of the ConfigMap collection in the aws-auth namespace
pub fn config_maps_path() -> String {
    format!("/api/v1/namespaces/{}/configmaps", aws_auth::NAMESPACE)
}

/// Issue exactly one create call for the payload
#[instrument(skip_all, fields(cluster = %descriptor.name(), kind = payload.kind()))]
pub async fn apply(
    client: &Client,
    descriptor: &ClusterDescriptor,
    credentials: &Credentials,
    payload: &MutationPayload,
) -> Result<Outcome> {
    match payload {
        MutationPayload::Deployment(deployment) => create_deployment(client, deployment).await,
        MutationPayload::ConfigMap(config_map) => {
            post_config_map(client, descriptor, credentials, config_map).await
        }
    }
}

/// Typed create; success is the call returning without error
async fn create_deployment(client: &Client, deployment: &Deployment) -> Result<Outcome> {
    let namespace = deployment
        .namespace()
        .unwrap_or_else(|| client.default_namespace().to_string());
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), &namespace);

    info!("Creating deployment {}/{}", namespace, deployment.name_any());

    match deployments.create(&PostParams::default(), deployment).await {
        Ok(created) => {
            info!("Created deployment {}/{}", namespace, created.name_any());
            Ok(Outcome::Success)
        }
        Err(kube::Error::Api(err)) => {
            warn!(
                "Deployment {} rejected with status {}: {}",
                deployment.name_any(),
                err.code,
                err.message
            );
            Ok(Outcome::Failure {
                status_code: err.code,
                body: format!("{}: {}", err.reason, err.message),
            })
        }
        Err(e) => Err(BootstrapError::TransientApi(format!(
            "Failed to create deployment {}: {}",
            deployment.name_any(),
            e
        ))),
    }
}

/// Raw POST of the ConfigMap document; only 201 Created counts as success
async fn post_config_map(
    client: &Client,
    descriptor: &ClusterDescriptor,
    credentials: &Credentials,
    config_map: &ConfigMap,
) -> Result<Outcome> {
    let request = config_map_request(descriptor, credentials, config_map)?;
    info!("POST {} ({})", request.uri(), config_map.name_any());

    let response = client.send(request.map(Body::from)).await.map_err(|e| {
        BootstrapError::TransientApi(format!("Failed to POST {}: {}", config_maps_path(), e))
    })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| BootstrapError::TransientApi(format!("Failed to read response body: {}", e)))?
        .to_bytes();
    let body = String::from_utf8_lossy(&body).into_owned();

    if status == StatusCode::CREATED {
        info!("Created configmap {}/{}", aws_auth::NAMESPACE, config_map.name_any());
        Ok(Outcome::Success)
    } else {
        warn!("Creating configmap {} returned HTTP {}", config_map.name_any(), status);
        Ok(Outcome::Failure {
            status_code: status.as_u16(),
            body,
        })
    }
}

/// Build the ConfigMap POST with the bearer token attached
pub fn config_map_request(
    descriptor: &ClusterDescriptor,
    credentials: &Credentials,
    config_map: &ConfigMap,
) -> Result<Request<Vec<u8>>> {
    let body = serde_json::to_vec(config_map)
        .map_err(|e| BootstrapError::Payload(format!("Failed to serialize configmap: {}", e)))?;

    let mut authorization = HeaderValue::from_str(&credentials.token.header_value())
        .map_err(|_| BootstrapError::TokenIssuance("Bearer token is not a valid header value".to_string()))?;
    authorization.set_sensitive(true);

    Request::builder()
        .method(Method::POST)
        .uri(descriptor.url_for(&config_maps_path())?)
        .header(AUTHORIZATION, authorization)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .map_err(|e| BootstrapError::Payload(format!("Failed to build request: {}", e)))
}
