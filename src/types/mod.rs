// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Values flowing through a single bootstrap invocation.

pub mod cluster;
pub mod outcome;
pub mod payload;
pub mod request;

pub use cluster::ClusterDescriptor;
pub use outcome::Outcome;
pub use payload::{DemoWorkload, MapRole, MutationPayload};
pub use request::AuthRequest;
