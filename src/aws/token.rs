// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bearer token issuance for EKS clusters.
//!
//! An EKS IAM token is a presigned STS `GetCallerIdentity` URL, base64url
//! encoded and prefixed with `k8s-aws-v1.`. The API server replays the URL
//! against STS to learn who the caller is.

use crate::constants::token::{
    CLUSTER_ID_HEADER, LIFETIME_SECS, PREFIX, PRESIGN_EXPIRES_SECS, SIGNING_NAME,
};
use crate::credentials::BearerToken;
use crate::error::{BootstrapError, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_sts::config::retry::RetryConfig;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SignatureLocation, SigningSettings,
};
use aws_sigv4::sign::v4;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use std::time::SystemTime;
use tracing::{debug, info, instrument};

/// Source of bearer tokens for a cluster
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Token scoped to the caller's own identity
    async fn caller_token(&self, cluster_id: &str) -> Result<BearerToken>;

    /// Token scoped to an assumed role
    async fn role_token(&self, cluster_id: &str, role_arn: &str) -> Result<BearerToken>;
}

/// Issues EKS IAM tokens by presigning STS requests
pub struct StsTokenIssuer {
    sdk_config: SdkConfig,
    sts: aws_sdk_sts::Client,
    role_session_name: String,
}

impl StsTokenIssuer {
    pub fn new(sdk_config: &SdkConfig, max_attempts: u32, role_session_name: &str) -> Self {
        let sts = aws_sdk_sts::Client::from_conf(
            aws_sdk_sts::config::Builder::from(sdk_config)
                .retry_config(RetryConfig::standard().with_max_attempts(max_attempts))
                .build(),
        );

        Self {
            sdk_config: sdk_config.clone(),
            sts,
            role_session_name: role_session_name.to_string(),
        }
    }

    fn region(&self) -> Result<&str> {
        self.sdk_config
            .region()
            .map(|r| -> &str { r.as_ref() })
            .ok_or_else(|| BootstrapError::TokenIssuance("No AWS region configured".to_string()))
    }
}

#[async_trait]
impl TokenIssuer for StsTokenIssuer {
    #[instrument(skip(self))]
    async fn caller_token(&self, cluster_id: &str) -> Result<BearerToken> {
        let credentials = self
            .sdk_config
            .credentials_provider()
            .ok_or_else(|| {
                BootstrapError::TokenIssuance(
                    "No credentials provider in the AWS configuration".to_string(),
                )
            })?
            .provide_credentials()
            .await
            .map_err(|e| {
                BootstrapError::TokenIssuance(format!(
                    "Unable to load caller credentials: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!("Presigning token with caller credentials");
        presign_token(&credentials, self.region()?, cluster_id, Utc::now())
    }

    #[instrument(skip(self))]
    async fn role_token(&self, cluster_id: &str, role_arn: &str) -> Result<BearerToken> {
        info!("Assuming role {} for cluster {}", role_arn, cluster_id);

        let output = self
            .sts
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(&self.role_session_name)
            .send()
            .await
            .map_err(|e| {
                BootstrapError::TokenIssuance(format!(
                    "Failed to assume role {}: {}",
                    role_arn,
                    DisplayErrorContext(&e)
                ))
            })?;

        let assumed = output.credentials().ok_or_else(|| {
            BootstrapError::TokenIssuance(format!("AssumeRole on {} returned no credentials", role_arn))
        })?;

        let credentials = aws_credential_types::Credentials::new(
            assumed.access_key_id(),
            assumed.secret_access_key(),
            Some(assumed.session_token().to_string()),
            SystemTime::try_from(*assumed.expiration()).ok(),
            "AssumeRole",
        );

        presign_token(&credentials, self.region()?, cluster_id, Utc::now())
    }
}

/// Hands out a token issued elsewhere
pub struct StaticTokenIssuer {
    token: SecretString,
}

impl StaticTokenIssuer {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenIssuer for StaticTokenIssuer {
    async fn caller_token(&self, _cluster_id: &str) -> Result<BearerToken> {
        Ok(BearerToken::new(
            self.token.clone(),
            Utc::now() + Duration::seconds(LIFETIME_SECS),
        ))
    }

    async fn role_token(&self, _cluster_id: &str, role_arn: &str) -> Result<BearerToken> {
        Err(BootstrapError::TokenIssuance(format!(
            "A static bearer token cannot be scoped to role {}",
            role_arn
        )))
    }
}

/// Build an EKS token from AWS credentials at the given signing time
pub fn presign_token(
    credentials: &aws_credential_types::Credentials,
    region: &str,
    cluster_id: &str,
    now: DateTime<Utc>,
) -> Result<BearerToken> {
    let identity = credentials.clone().into();

    let mut settings = SigningSettings::default();
    settings.signature_location = SignatureLocation::QueryParams;
    settings.expires_in = Some(std::time::Duration::from_secs(PRESIGN_EXPIRES_SECS));

    let signing_params = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(SIGNING_NAME)
        .time(SystemTime::from(now))
        .settings(settings)
        .build()
        .map_err(|e| {
            BootstrapError::TokenIssuance(format!("Failed to build signing params: {}", e))
        })?
        .into();

    let uri = format!(
        "https://sts.{}.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15",
        region
    );

    let mut request = http::Request::builder()
        .uri(&uri)
        .header(CLUSTER_ID_HEADER, cluster_id)
        .body(())
        .map_err(|e| {
            BootstrapError::TokenIssuance(format!("Failed to build STS request: {}", e))
        })?;

    let signable = SignableRequest::new(
        "GET",
        uri.as_str(),
        std::iter::once((CLUSTER_ID_HEADER, cluster_id)),
        SignableBody::Bytes(&[]),
    )
    .map_err(|e| {
        BootstrapError::TokenIssuance(format!("Failed to create signable request: {}", e))
    })?;

    let (instructions, _signature) = sign(signable, &signing_params)
        .map_err(|e| BootstrapError::TokenIssuance(format!("Failed to sign STS request: {}", e)))?
        .into_parts();
    instructions.apply_to_request_http1x(&mut request);

    let token = format!(
        "{}{}",
        PREFIX,
        URL_SAFE_NO_PAD.encode(request.uri().to_string())
    );

    Ok(BearerToken::new(
        token,
        now + Duration::seconds(LIFETIME_SECS),
    ))
}
