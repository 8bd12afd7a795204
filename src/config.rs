// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_ROLE_SESSION_NAME};
use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use std::env;
use std::fmt;
use std::str::FromStr;

/// The single mutating action performed against the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Create the demo Deployment through the typed API
    Deployment,
    /// POST the aws-auth ConfigMap mapping the node role into the cluster
    AwsAuth,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deployment" => Ok(Mode::Deployment),
            "aws-auth" => Ok(Mode::AwsAuth),
            other => bail!("unknown mode '{}', expected 'deployment' or 'aws-auth'", other),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Deployment => write!(f, "deployment"),
            Mode::AwsAuth => write!(f, "aws-auth"),
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    /// Pre-issued bearer token; when set, no token is requested from STS
    pub static_token: Option<SecretString>,
    /// Maximum attempts for EKS and STS calls
    pub max_attempts: u32,
    pub role_session_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::AwsAuth,
            static_token: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            role_session_name: DEFAULT_ROLE_SESSION_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let mode = match lookup("BOOTSTRAP_MODE") {
            Some(mode) => mode.parse::<Mode>().context("invalid BOOTSTRAP_MODE")?,
            None => defaults.mode,
        };

        let static_token = lookup("EKS_BEARER_TOKEN")
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        let max_attempts = match lookup("EKS_API_MAX_ATTEMPTS") {
            Some(n) => n
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .context("EKS_API_MAX_ATTEMPTS must be a positive integer")?,
            None => defaults.max_attempts,
        };

        let role_session_name =
            lookup("EKS_ROLE_SESSION_NAME").unwrap_or(defaults.role_session_name);

        Ok(Config {
            mode,
            static_token,
            max_attempts,
            role_session_name,
        })
    }
}
