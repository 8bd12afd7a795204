// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster credential assembly: trust store from the cluster CA bundle plus a
//! bearer token scoped to the cluster.

use crate::aws::token::TokenIssuer;
use crate::error::{BootstrapError, Result};
use crate::types::ClusterDescriptor;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

/// Short-lived token proving identity to the cluster API server
#[derive(Clone, Debug)]
pub struct BearerToken {
    secret: SecretString,
    expires_at: DateTime<Utc>,
}

impl BearerToken {
    pub fn new(secret: impl Into<SecretString>, expires_at: DateTime<Utc>) -> Self {
        BearerToken {
            secret: secret.into(),
            expires_at,
        }
    }

    pub fn secret(&self) -> &SecretString {
        &self.secret
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Value for an `Authorization` header
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.secret.expose_secret())
    }
}

/// DER-encoded CA certificates the cluster client trusts, and nothing else
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustStore(Vec<Vec<u8>>);

impl TrustStore {
    /// Decode a base64 PEM bundle, keeping every CERTIFICATE block
    pub fn from_base64_pem(bundle: &str) -> Result<Self> {
        let pem_bytes = STANDARD.decode(bundle.trim()).map_err(|e| {
            BootstrapError::MalformedCertificate(format!("CA bundle is not valid base64: {}", e))
        })?;

        let blocks = pem::parse_many(&pem_bytes).map_err(|e| {
            BootstrapError::MalformedCertificate(format!("CA bundle is not valid PEM: {}", e))
        })?;

        let certificates: Vec<Vec<u8>> = blocks
            .into_iter()
            .filter(|block| block.tag() == "CERTIFICATE")
            .map(|block| block.into_contents())
            .collect();

        if certificates.is_empty() {
            return Err(BootstrapError::MalformedCertificate(
                "CA bundle contains no certificates".to_string(),
            ));
        }

        Ok(TrustStore(certificates))
    }

    pub fn certificates(&self) -> &[Vec<u8>] {
        &self.0
    }
}

/// Everything needed to authenticate one call against a cluster.
/// Lives for a single invocation only.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub token: BearerToken,
    pub trust_store: TrustStore,
}

/// Assemble credentials for a cluster.
///
/// The CA bundle is decoded first so that a malformed bundle never leads to a
/// token request. The role-scoped token is requested if and only if
/// `role_arn` is set.
#[instrument(skip(descriptor, issuer), fields(cluster = %descriptor.name()))]
pub async fn build_credentials(
    descriptor: &ClusterDescriptor,
    role_arn: Option<&str>,
    issuer: &dyn TokenIssuer,
) -> Result<Credentials> {
    let trust_store = TrustStore::from_base64_pem(descriptor.certificate_authority())?;
    debug!(
        "Decoded {} CA certificate(s) for cluster {}",
        trust_store.certificates().len(),
        descriptor.name()
    );

    let token = match role_arn {
        Some(role_arn) => issuer.role_token(descriptor.name(), role_arn).await?,
        None => issuer.caller_token(descriptor.name()).await?,
    };
    debug!("Obtained bearer token valid until {}", token.expires_at());

    Ok(Credentials { token, trust_store })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::token::MockTokenIssuer;
    use crate::test_utils::{ca_bundle_base64, pem_bundle, TEST_CA_DER};

    fn make_descriptor(ca: &str) -> ClusterDescriptor {
        ClusterDescriptor::new("test-cluster", "https://cluster.example", ca).unwrap()
    }

    fn make_token(value: &str) -> BearerToken {
        BearerToken::new(value.to_string(), Utc::now())
    }

    #[test]
    fn test_trust_store_from_valid_bundle() {
        let store = TrustStore::from_base64_pem(&ca_bundle_base64()).unwrap();
        assert_eq!(store.certificates(), &[TEST_CA_DER.to_vec()]);
    }

    #[test]
    fn test_trust_store_keeps_every_certificate() {
        let bundle = format!("{}{}", pem_bundle(b"first"), pem_bundle(b"second"));
        let store = TrustStore::from_base64_pem(&STANDARD.encode(bundle)).unwrap();

        assert_eq!(
            store.certificates(),
            &[b"first".to_vec(), b"second".to_vec()]
        );
    }

    #[test]
    fn test_trust_store_skips_non_certificate_blocks() {
        let key = pem::encode(&pem::Pem::new("PRIVATE KEY", b"key".to_vec()));
        let bundle = format!("{}{}", key, pem_bundle(b"ca"));
        let store = TrustStore::from_base64_pem(&STANDARD.encode(bundle)).unwrap();

        assert_eq!(store.certificates(), &[b"ca".to_vec()]);
    }

    #[test]
    fn test_trust_store_rejects_bad_base64() {
        for input in ["%%%not-base64%%%", "abc", "====", "TUlJQ"] {
            assert!(
                matches!(
                    TrustStore::from_base64_pem(input),
                    Err(BootstrapError::MalformedCertificate(_))
                ),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn test_trust_store_rejects_base64_without_pem() {
        let input = STANDARD.encode("just some text");
        assert!(matches!(
            TrustStore::from_base64_pem(&input),
            Err(BootstrapError::MalformedCertificate(_))
        ));
    }

    #[test]
    fn test_bearer_token_debug_is_redacted() {
        let token = make_token("tok-abc");
        assert!(!format!("{:?}", token).contains("tok-abc"));
        assert_eq!(token.header_value(), "Bearer tok-abc");
    }

    #[tokio::test]
    async fn test_malformed_bundle_never_requests_token() {
        let mut issuer = MockTokenIssuer::new();
        issuer.expect_caller_token().never();
        issuer.expect_role_token().never();

        let result = build_credentials(&make_descriptor("%%%"), None, &issuer).await;

        assert!(matches!(result, Err(BootstrapError::MalformedCertificate(_))));
    }

    #[tokio::test]
    async fn test_caller_token_without_role() {
        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_caller_token()
            .withf(|cluster| cluster == "test-cluster")
            .times(1)
            .returning(|_| Ok(make_token("caller-token")));
        issuer.expect_role_token().never();

        let credentials = build_credentials(&make_descriptor(&ca_bundle_base64()), None, &issuer)
            .await
            .unwrap();

        assert_eq!(credentials.token.secret().expose_secret(), "caller-token");
        assert_eq!(credentials.trust_store.certificates().len(), 1);
    }

    #[tokio::test]
    async fn test_role_token_with_role() {
        let mut issuer = MockTokenIssuer::new();
        issuer.expect_caller_token().never();
        issuer
            .expect_role_token()
            .withf(|cluster, role| cluster == "test-cluster" && role == "arn:aws:iam::1:role/admin")
            .times(1)
            .returning(|_, _| Ok(make_token("role-token")));

        let credentials = build_credentials(
            &make_descriptor(&ca_bundle_base64()),
            Some("arn:aws:iam::1:role/admin"),
            &issuer,
        )
        .await
        .unwrap();

        assert_eq!(credentials.token.secret().expose_secret(), "role-token");
    }

    #[tokio::test]
    async fn test_issuer_failure_is_propagated() {
        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_caller_token()
            .returning(|_| Err(BootstrapError::TokenIssuance("no credentials".to_string())));

        let result = build_credentials(&make_descriptor(&ca_bundle_base64()), None, &issuer).await;

        assert!(matches!(result, Err(BootstrapError::TokenIssuance(_))));
    }
}
