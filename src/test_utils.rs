// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::credentials::Credentials;
use crate::error::Result;
use crate::kubernetes::ClusterConnector;
use crate::types::ClusterDescriptor;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::{HeaderMap, Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// DER body of the fake cluster CA
pub const TEST_CA_DER: &[u8] = b"test-cluster-ca";

/// PEM encoding of a single certificate body
pub fn pem_bundle(der: &[u8]) -> String {
    pem::encode(&pem::Pem::new("CERTIFICATE", der.to_vec()))
}

/// CA bundle as the cluster API returns it: base64 of the PEM text
pub fn ca_bundle_base64() -> String {
    STANDARD.encode(pem_bundle(TEST_CA_DER))
}

/// A request as seen by the mock API server
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// In stateful mode every POST creates the named object: the first create
/// echoes the object back with 201, a repeated create gets 409 AlreadyExists.
/// An unreachable service records each request, then fails it at the transport.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    created: Arc<Mutex<HashSet<String>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    stateful: bool,
    unreachable: bool,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            created: Arc::new(Mutex::new(HashSet::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            stateful: false,
            unreachable: false,
        }
    }

    /// Track created objects instead of answering from canned responses
    pub fn stateful(mut self) -> Self {
        self.stateful = true;
        self
    }

    /// Fail every request as if the connection was refused
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(("POST".to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, request: &RecordedRequest) -> (u16, String) {
        if self.stateful && request.method == "POST" {
            return self.create(request);
        }

        self.responses
            .lock()
            .unwrap()
            .get(&(request.method.clone(), request.path.clone()))
            .cloned()
            .unwrap_or_else(|| (404, status_json(404, "NotFound", "not found")))
    }

    fn create(&self, request: &RecordedRequest) -> (u16, String) {
        let name = serde_json::from_slice::<serde_json::Value>(&request.body)
            .ok()
            .and_then(|v| v["metadata"]["name"].as_str().map(str::to_string))
            .unwrap_or_default();
        let key = format!("{}/{}", request.path, name);

        if self.created.lock().unwrap().insert(key) {
            (201, String::from_utf8_lossy(&request.body).into_owned())
        } else {
            (
                409,
                status_json(409, "AlreadyExists", &format!("\"{}\" already exists", name)),
            )
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let this = self.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = body.collect().await?.to_bytes().to_vec();
            let recorded = RecordedRequest {
                method: parts.method.to_string(),
                uri: parts.uri.to_string(),
                path: parts.uri.path().to_string(),
                headers: parts.headers,
                body,
            };

            let (status, body) = this.respond(&recorded);
            this.requests.lock().unwrap().push(recorded);

            if this.unreachable {
                return Err("connection refused".into());
            }

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Connector handing out clients backed by a mock service
#[derive(Clone)]
pub struct MockConnector {
    pub service: MockService,
}

impl ClusterConnector for MockConnector {
    fn connect(&self, _descriptor: &ClusterDescriptor, _credentials: &Credentials) -> Result<Client> {
        Ok(self.service.clone().into_client())
    }
}

/// Create a Kubernetes Status response body
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}
