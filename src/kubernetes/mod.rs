// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes side: pinned cluster clients and the single create call.

pub mod client;
pub mod executor;

pub use client::{ClusterConnector, PinnedTlsConnector};
pub use executor::apply;
