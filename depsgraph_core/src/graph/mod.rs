// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dependency graph storage, node tagging, flushing and the graph registry.

mod build;
mod depsgraph;
mod flush;
mod node_tag;
mod registry;

pub use build::RelationError;
pub use depsgraph::Depsgraph;
pub use registry::{GraphId, GraphRegistry};
