// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node model of a dependency graph.
//!
//! A graph owns one [`IdNode`] per participating data-block. Each ID node
//! owns its [`ComponentNode`]s, and each component refers to the
//! [`OperationNode`]s it owns by [`OperationKey`]. Operations live in a flat
//! arena on the graph so that relations between them can be tracked by index.
//!
//! The static per-component properties (which recalc flags a component
//! implies, whether it needs a copy-on-write refresh first) are exposed on
//! [`NodeType`].

mod component;
mod id_node;
mod kind;
mod operation;

pub use component::ComponentNode;
pub use id_node::{EvaluatedCopy, IdNode};
pub use kind::{NodeType, OperationCode};
pub use operation::{OperationFlags, OperationKey, OperationNode};
