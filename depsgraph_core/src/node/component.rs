// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component nodes: one category of recomputation for a data-block.

use alloc::vec::Vec;

use super::kind::{NodeType, OperationCode};
use super::operation::OperationKey;

/// A component owned by exactly one ID node.
///
/// Operations are listed in insertion order. At most one operation per
/// [`OperationCode`] is registered.
#[derive(Clone, Debug)]
pub struct ComponentNode {
    pub(crate) kind: NodeType,
    pub(crate) operations: Vec<(OperationCode, OperationKey)>,
    pub(crate) entry_operation: Option<OperationKey>,
}

impl ComponentNode {
    pub(crate) fn new(kind: NodeType) -> Self {
        Self {
            kind,
            operations: Vec::new(),
            entry_operation: None,
        }
    }

    /// Returns the component type.
    #[must_use]
    pub fn kind(&self) -> NodeType {
        self.kind
    }

    /// Returns the operation registered under `opcode`, if any.
    #[must_use]
    pub fn find_operation(&self, opcode: OperationCode) -> Option<OperationKey> {
        self.operations
            .iter()
            .find(|(code, _)| *code == opcode)
            .map(|&(_, key)| key)
    }

    /// Iterates over the operations of this component, in insertion order.
    pub fn operations(&self) -> impl Iterator<Item = OperationKey> + '_ {
        self.operations.iter().map(|&(_, key)| key)
    }

    /// Returns the operation that gates entry into this component.
    ///
    /// This is the explicitly configured entry, or the sole operation when the
    /// component has exactly one.
    #[must_use]
    pub fn entry_operation(&self) -> Option<OperationKey> {
        match (self.entry_operation, self.operations.as_slice()) {
            (Some(entry), _) => Some(entry),
            (None, [(_, only)]) => Some(*only),
            (None, _) => None,
        }
    }

    /// See [`NodeType::need_tag_cow_before_update`].
    #[must_use]
    pub fn need_tag_cow_before_update(&self) -> bool {
        self.kind.need_tag_cow_before_update()
    }
}
