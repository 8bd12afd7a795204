// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The aws-auth ConfigMap that maps IAM identities into the cluster
pub mod aws_auth {
    pub const NAME: &str = "aws-auth";
    pub const NAMESPACE: &str = "kube-system";
    /// Data key holding the role mappings as a YAML list
    pub const MAP_ROLES_KEY: &str = "mapRoles";
    /// Username template resolved by the EKS authenticator for worker nodes
    pub const NODE_USERNAME: &str = "system:node:{{EC2PrivateDNSName}}";
    pub const NODE_GROUPS: [&str; 2] = ["system:bootstrappers", "system:nodes"];
}

/// Defaults for the demo workload created in deployment mode
pub mod demo {
    pub const NAME: &str = "demo-deployment";
    pub const NAMESPACE: &str = "default";
    pub const REPLICAS: i32 = 2;
    pub const APP_LABEL: &str = "demo";
    pub const CONTAINER_NAME: &str = "web";
    pub const IMAGE: &str = "nginx:1.12";
    pub const PORT_NAME: &str = "http";
    pub const PORT: i32 = 80;
}

/// EKS IAM token parameters
pub mod token {
    pub const PREFIX: &str = "k8s-aws-v1.";
    /// Header carrying the cluster name, signed into the presigned URL
    pub const CLUSTER_ID_HEADER: &str = "x-k8s-aws-id";
    pub const SIGNING_NAME: &str = "sts";
    /// Lifetime of the presigned STS URL in seconds
    pub const PRESIGN_EXPIRES_SECS: u64 = 60;
    /// EKS accepts a token for 15 minutes; report one minute less
    pub const LIFETIME_SECS: i64 = 14 * 60;
}

pub const DEFAULT_ROLE_SESSION_NAME: &str = "eks-bootstrap";

/// Fail fast unless configured otherwise
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;
