// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operation nodes: the finest-grained schedulable unit.

use core::fmt;

use super::kind::{NodeType, OperationCode};

/// A handle to an operation in a [`Depsgraph`](crate::graph::Depsgraph).
///
/// Operations are never removed from a graph, so the handle is a plain index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationKey(pub(crate) u32);

impl OperationKey {
    /// Returns the raw index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperationKey({})", self.0)
    }
}

/// Per-operation state flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OperationFlags {
    /// The operation must be re-evaluated.
    pub needs_update: bool,
    /// The operation was tagged directly rather than reached by a flush.
    pub directly_modified: bool,
    /// The tag came from a user edit.
    pub user_modified: bool,
}

/// An operation owned by one component of one ID node.
#[derive(Clone, Debug)]
pub struct OperationNode {
    /// Index of the owning ID node within the graph.
    pub(crate) owner: u32,
    /// Type of the owning component.
    pub(crate) component: NodeType,
    pub(crate) opcode: OperationCode,
    pub(crate) flags: OperationFlags,
}

impl OperationNode {
    /// Returns the operation code.
    #[must_use]
    pub fn opcode(&self) -> OperationCode {
        self.opcode
    }

    /// Returns the type of the owning component.
    #[must_use]
    pub fn component(&self) -> NodeType {
        self.component
    }

    /// Returns the current state flags.
    #[must_use]
    pub fn flags(&self) -> OperationFlags {
        self.flags
    }

    /// Returns whether the operation must be re-evaluated.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.flags.needs_update
    }
}
