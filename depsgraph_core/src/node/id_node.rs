// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ID nodes: one per data-block participating in a graph.

use alloc::vec::Vec;

use crate::id::{IdRef, IdType};
use crate::recalc::RecalcFlags;

use super::component::ComponentNode;
use super::kind::NodeType;

/// The graph-private evaluation copy of a data-block.
///
/// Only the state the tagging core reads and writes is modeled: the
/// accumulated recalc flags and whether the copy has been expanded from the
/// original. Duplication itself belongs to the host's copy-on-write mechanism,
/// which reports back through [`IdNode::set_cow_expanded`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluatedCopy {
    /// Recalc flags accumulated until the next clear.
    pub recalc: RecalcFlags,
    /// Whether the copy holds expanded data.
    pub expanded: bool,
}

/// A data-block's node in one graph.
#[derive(Clone, Debug)]
pub struct IdNode {
    pub(crate) id_orig: IdRef,
    pub(crate) id_type: IdType,
    pub(crate) cow: EvaluatedCopy,
    pub(crate) components: Vec<ComponentNode>,
    pub(crate) visible_components_mask: u64,
    pub(crate) previously_visible_components_mask: u64,
    pub(crate) is_cow_explicitly_tagged: bool,
    pub(crate) is_user_modified: bool,
    pub(crate) id_cow_recalc_backup: RecalcFlags,
}

impl IdNode {
    pub(crate) fn new(id_orig: IdRef, id_type: IdType) -> Self {
        Self {
            id_orig,
            id_type,
            cow: EvaluatedCopy::default(),
            components: Vec::new(),
            visible_components_mask: 0,
            previously_visible_components_mask: 0,
            is_cow_explicitly_tagged: false,
            is_user_modified: false,
            id_cow_recalc_backup: RecalcFlags::NONE,
        }
    }

    /// Returns the original data-block this node evaluates.
    #[must_use]
    pub fn id_orig(&self) -> IdRef {
        self.id_orig
    }

    /// Returns the type of the original data-block.
    #[must_use]
    pub fn id_type(&self) -> IdType {
        self.id_type
    }

    /// Returns the evaluation copy.
    #[must_use]
    pub fn cow(&self) -> &EvaluatedCopy {
        &self.cow
    }

    /// Returns the recalc flags of the evaluation copy.
    #[must_use]
    pub fn cow_recalc(&self) -> RecalcFlags {
        self.cow.recalc
    }

    /// Records whether the host has expanded the evaluation copy.
    pub fn set_cow_expanded(&mut self, expanded: bool) {
        self.cow.expanded = expanded;
    }

    /// Returns the component of the given type, if present.
    #[must_use]
    pub fn find_component(&self, kind: NodeType) -> Option<&ComponentNode> {
        self.components.iter().find(|c| c.kind == kind)
    }

    pub(crate) fn component_index(&self, kind: NodeType) -> Option<usize> {
        self.components.iter().position(|c| c.kind == kind)
    }

    /// Iterates over the components, in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentNode> + '_ {
        self.components.iter()
    }

    /// Returns the mask of components whose output is currently visible.
    #[must_use]
    pub fn visible_components_mask(&self) -> u64 {
        self.visible_components_mask
    }

    /// Returns the visibility mask as of the last visibility pass.
    #[must_use]
    pub fn previously_visible_components_mask(&self) -> u64 {
        self.previously_visible_components_mask
    }

    /// Sets the mask of visible components.
    ///
    /// Bits come from [`NodeType::visibility_bit`].
    pub fn set_visible_components_mask(&mut self, mask: u64) {
        self.visible_components_mask = mask;
    }

    /// Marks every present component visible.
    pub fn set_all_components_visible(&mut self) {
        self.visible_components_mask = self
            .components
            .iter()
            .filter_map(|c| c.kind.visibility_bit())
            .fold(0, |mask, bit| mask | bit);
    }

    /// Returns whether the copy-on-write component was tagged explicitly
    /// since the last clear.
    #[must_use]
    pub fn is_cow_explicitly_tagged(&self) -> bool {
        self.is_cow_explicitly_tagged
    }

    /// Returns whether a user edit reached this node since the last clear.
    #[must_use]
    pub fn is_user_modified(&self) -> bool {
        self.is_user_modified
    }

    /// Returns the recalc flags saved by the last backing clear.
    #[must_use]
    pub fn id_cow_recalc_backup(&self) -> RecalcFlags {
        self.id_cow_recalc_backup
    }
}
