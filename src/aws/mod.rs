// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! AWS-side collaborators: cluster lookup and token issuance.

pub mod eks;
pub mod token;

pub use eks::{ClusterLocator, EksClusterLocator};
pub use token::{StaticTokenIssuer, StsTokenIssuer, TokenIssuer};

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load the shared AWS configuration, optionally pinned to a profile and region
pub async fn load_sdk_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
