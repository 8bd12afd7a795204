// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Objects sent to the cluster by the single mutating call.

use crate::config::Mode;
use crate::constants::{aws_auth, demo};
use crate::error::{BootstrapError, Result};
use crate::types::AuthRequest;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{ConfigMap, Container, ContainerPort, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Either object the executor knows how to create
#[derive(Clone, Debug)]
pub enum MutationPayload {
    Deployment(Deployment),
    ConfigMap(ConfigMap),
}

impl MutationPayload {
    /// Build the payload for a mode; the request must already be validated
    pub fn for_mode(mode: Mode, request: &AuthRequest, workload: &DemoWorkload) -> Result<Self> {
        match mode {
            Mode::Deployment => Ok(MutationPayload::Deployment(workload.to_deployment())),
            Mode::AwsAuth => {
                let node_role_arn = request.node_role_arn().ok_or_else(|| {
                    BootstrapError::InvalidRequest("nodeRoleArn is required in aws-auth mode".to_string())
                })?;
                aws_auth_config_map(node_role_arn).map(MutationPayload::ConfigMap)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MutationPayload::Deployment(_) => "Deployment",
            MutationPayload::ConfigMap(_) => "ConfigMap",
        }
    }
}

/// Shape of the demo Deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoWorkload {
    pub name: String,
    pub namespace: String,
    pub replicas: i32,
    pub app_label: String,
    pub container_name: String,
    pub image: String,
    pub port_name: String,
    pub port: i32,
}

impl Default for DemoWorkload {
    fn default() -> Self {
        DemoWorkload {
            name: demo::NAME.to_string(),
            namespace: demo::NAMESPACE.to_string(),
            replicas: demo::REPLICAS,
            app_label: demo::APP_LABEL.to_string(),
            container_name: demo::CONTAINER_NAME.to_string(),
            image: demo::IMAGE.to_string(),
            port_name: demo::PORT_NAME.to_string(),
            port: demo::PORT,
        }
    }
}

impl DemoWorkload {
    pub fn to_deployment(&self) -> Deployment {
        let labels = BTreeMap::from([("app".to_string(), self.app_label.clone())]);

        Deployment {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(self.replicas),
                selector: LabelSelector {
                    match_labels: Some(labels.clone()),
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(labels),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        containers: vec![Container {
                            name: self.container_name.clone(),
                            image: Some(self.image.clone()),
                            ports: Some(vec![ContainerPort {
                                name: Some(self.port_name.clone()),
                                protocol: Some("TCP".to_string()),
                                container_port: self.port,
                                ..Default::default()
                            }]),
                            ..Default::default()
                        }],
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// One entry of the aws-auth `mapRoles` list
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MapRole {
    pub rolearn: String,
    pub username: String,
    pub groups: Vec<String>,
}

impl MapRole {
    /// Mapping that lets worker nodes with the given role join the cluster
    pub fn for_node_role(role_arn: &str) -> Self {
        MapRole {
            rolearn: role_arn.to_string(),
            username: aws_auth::NODE_USERNAME.to_string(),
            groups: aws_auth::NODE_GROUPS.iter().map(|g| g.to_string()).collect(),
        }
    }
}

/// Build the aws-auth ConfigMap for a worker-node role
pub fn aws_auth_config_map(node_role_arn: &str) -> Result<ConfigMap> {
    let map_roles = serde_yaml::to_string(&vec![MapRole::for_node_role(node_role_arn)])
        .map_err(|e| BootstrapError::Payload(format!("Failed to render mapRoles: {}", e)))?;

    Ok(ConfigMap {
        metadata: ObjectMeta {
            name: Some(aws_auth::NAME.to_string()),
            namespace: Some(aws_auth::NAMESPACE.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            aws_auth::MAP_ROLES_KEY.to_string(),
            map_roles,
        )])),
        ..Default::default()
    })
}
