// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{BootstrapError, Result};
use serde::{Deserialize, Serialize};

/// Result of the single call against the control plane
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "status")]
pub enum Outcome {
    Success,
    #[serde(rename_all = "camelCase")]
    Failure { status_code: u16, body: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Turn a failed outcome into the matching error
    pub fn into_result(self) -> Result<()> {
        match self {
            Outcome::Success => Ok(()),
            Outcome::Failure {
                status_code: 409,
                body,
            } => Err(BootstrapError::Conflict { body }),
            Outcome::Failure { status_code, body } => {
                Err(BootstrapError::UnexpectedStatus { status_code, body })
            }
        }
    }
}
