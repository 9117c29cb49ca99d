// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view dependency graph storage and state flags.

use alloc::vec::Vec;

use hashbrown::HashMap;
use understory_dirty::{CycleHandling, DirtyTracker};

use crate::config::{DebugFlags, DepsgraphConfig};
use crate::datablock::Main;
use crate::id::{IdRef, IdType, MainId, ViewLayerId};
use crate::node::{ComponentNode, IdNode, NodeType, OperationCode, OperationKey, OperationNode};

use super::registry::GraphId;

/// A per-view evaluation graph.
///
/// Owns one [`IdNode`] per participating data-block plus the operation arena
/// and the relations between operations. Original data-blocks are referenced
/// through [`IdRef`] handles into the [`Main`] the graph was created for and
/// are never owned.
#[derive(Debug)]
pub struct Depsgraph {
    // -- Inputs --
    pub(crate) main: MainId,
    pub(crate) scene: IdRef,
    pub(crate) view_layer: ViewLayerId,
    pub(crate) registered_as: Option<GraphId>,

    // -- Nodes --
    pub(crate) id_nodes: Vec<IdNode>,
    pub(crate) id_lookup: HashMap<IdRef, u32>,
    pub(crate) operations: Vec<OperationNode>,

    // -- Relations and entry tags --
    pub(crate) relations: DirtyTracker<u32>,
    pub(crate) time_dependents: Vec<OperationKey>,
    pub(crate) time_source_tagged: bool,

    // -- State --
    pub(crate) is_active: bool,
    pub(crate) is_evaluating: bool,
    pub(crate) use_editors_update: bool,
    pub(crate) need_update_relations: bool,
    pub(crate) need_tag_id_on_graph_visibility_update: bool,
    pub(crate) need_tag_id_on_graph_visibility_time_update: bool,
    pub(crate) id_type_updated: [bool; IdType::COUNT],
    pub(crate) id_type_exist: [bool; IdType::COUNT],
    pub(crate) debug: DebugFlags,
}

impl Depsgraph {
    /// Creates an empty graph for `scene` and `view_layer` of `main`.
    ///
    /// # Panics
    ///
    /// Panics if `scene` is stale or not a scene.
    #[must_use]
    pub fn new(
        main: &Main,
        scene: IdRef,
        view_layer: ViewLayerId,
        config: DepsgraphConfig,
    ) -> Self {
        assert!(
            main.block(scene).id_type() == IdType::Scene,
            "graph input must be a scene"
        );
        Self {
            main: main.id(),
            scene,
            view_layer,
            registered_as: None,
            id_nodes: Vec::new(),
            id_lookup: HashMap::new(),
            operations: Vec::new(),
            relations: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            time_dependents: Vec::new(),
            time_source_tagged: false,
            is_active: config.active,
            is_evaluating: false,
            use_editors_update: config.editors_update,
            // A fresh graph has no relations yet.
            need_update_relations: true,
            need_tag_id_on_graph_visibility_update: false,
            need_tag_id_on_graph_visibility_time_update: false,
            id_type_updated: [false; IdType::COUNT],
            id_type_exist: [false; IdType::COUNT],
            debug: config.debug,
        }
    }

    // -- Inputs --

    /// Returns the identity of the database this graph was built for.
    #[must_use]
    pub fn main_id(&self) -> MainId {
        self.main
    }

    /// Returns the input scene.
    #[must_use]
    pub fn scene(&self) -> IdRef {
        self.scene
    }

    /// Returns the input view layer.
    #[must_use]
    pub fn view_layer(&self) -> ViewLayerId {
        self.view_layer
    }

    /// Returns the registry handle, if the graph is registered.
    #[must_use]
    pub fn registered_as(&self) -> Option<GraphId> {
        self.registered_as
    }

    // -- Node lookup --

    /// Returns the ID node of `id`, if `id` participates in this graph.
    #[must_use]
    pub fn find_id_node(&self, id: IdRef) -> Option<&IdNode> {
        let &idx = self.id_lookup.get(&id)?;
        Some(&self.id_nodes[idx as usize])
    }

    /// Mutable variant of [`find_id_node`](Self::find_id_node).
    pub fn find_id_node_mut(&mut self, id: IdRef) -> Option<&mut IdNode> {
        let &idx = self.id_lookup.get(&id)?;
        Some(&mut self.id_nodes[idx as usize])
    }

    pub(crate) fn id_node_index(&self, id: IdRef) -> Option<u32> {
        self.id_lookup.get(&id).copied()
    }

    /// Iterates over all ID nodes, in insertion order.
    pub fn id_nodes(&self) -> impl Iterator<Item = &IdNode> + '_ {
        self.id_nodes.iter()
    }

    /// Returns the operation node behind `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not belong to this graph.
    #[must_use]
    pub fn operation(&self, key: OperationKey) -> &OperationNode {
        &self.operations[key.0 as usize]
    }

    /// Returns the operation `opcode` of component `kind` of `id`, if present.
    #[must_use]
    pub fn find_operation(
        &self,
        id: IdRef,
        kind: NodeType,
        opcode: OperationCode,
    ) -> Option<OperationKey> {
        self.find_id_node(id)?
            .find_component(kind)?
            .find_operation(opcode)
    }

    /// Returns the component `kind` of `id`, if present.
    #[must_use]
    pub fn find_component(&self, id: IdRef, kind: NodeType) -> Option<&ComponentNode> {
        self.find_id_node(id)?.find_component(kind)
    }

    /// Returns whether any operation of component `kind` of `id` needs an
    /// update.
    #[must_use]
    pub fn component_needs_update(&self, id: IdRef, kind: NodeType) -> bool {
        self.find_component(id, kind).is_some_and(|comp| {
            comp.operations()
                .any(|key| self.operations[key.0 as usize].flags.needs_update)
        })
    }

    /// Iterates over the operations that currently need an update.
    pub fn operations_needing_update(&self) -> impl Iterator<Item = OperationKey> + '_ {
        self.operations
            .iter()
            .enumerate()
            .filter(|(_, op)| op.flags.needs_update)
            .map(|(idx, _)| {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "operation count is bounded by u32 in add_operation"
                )]
                let idx = idx as u32;
                OperationKey(idx)
            })
    }

    // -- State --

    /// Returns whether the graph is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Makes the graph active: it will notify editors and write user-edit
    /// flags back to the original data-blocks.
    pub fn make_active(&mut self) {
        self.is_active = true;
    }

    /// Makes the graph inactive.
    pub fn make_inactive(&mut self) {
        self.is_active = false;
    }

    /// Returns whether the evaluator is currently running on this graph.
    #[must_use]
    pub fn is_evaluating(&self) -> bool {
        self.is_evaluating
    }

    /// Sets the re-entrancy guard.
    ///
    /// While set, every tag request against this graph is dropped. Callers
    /// needing a tag applied must re-issue it after evaluation.
    pub fn set_evaluating(&mut self, evaluating: bool) {
        self.is_evaluating = evaluating;
    }

    /// Returns whether editor updates are enabled.
    #[must_use]
    pub fn use_editors_update(&self) -> bool {
        self.use_editors_update
    }

    /// Returns the debug flags.
    #[must_use]
    pub fn debug_flags(&self) -> DebugFlags {
        self.debug
    }

    /// Sets the debug flags.
    pub fn set_debug_flags(&mut self, debug: DebugFlags) {
        self.debug = debug;
    }

    /// Returns whether relations must be rebuilt before the next evaluation.
    #[must_use]
    pub fn need_update_relations(&self) -> bool {
        self.need_update_relations
    }

    /// Requests a relations rebuild before the next evaluation.
    pub fn tag_relations_update(&mut self) {
        self.need_update_relations = true;
    }

    /// Acknowledges that relations were rebuilt.
    pub fn clear_relations_update(&mut self) {
        self.need_update_relations = false;
    }

    /// Returns whether a visibility pass is pending.
    #[must_use]
    pub fn need_tag_id_on_graph_visibility_update(&self) -> bool {
        self.need_tag_id_on_graph_visibility_update
    }

    /// Returns whether the pending visibility pass also covers a frame change.
    #[must_use]
    pub fn need_tag_id_on_graph_visibility_time_update(&self) -> bool {
        self.need_tag_id_on_graph_visibility_time_update
    }

    /// Returns whether a data-block of type `ty` was tagged since the last
    /// clear.
    #[must_use]
    pub fn id_type_updated(&self, ty: IdType) -> bool {
        self.id_type_updated[ty.index()]
    }

    /// Returns whether any data-block type was tagged since the last clear.
    #[must_use]
    pub fn id_type_any_updated(&self) -> bool {
        self.id_type_updated.iter().any(|&updated| updated)
    }

    /// Returns whether the graph contains a data-block of type `ty`.
    #[must_use]
    pub fn id_type_exists(&self, ty: IdType) -> bool {
        self.id_type_exist[ty.index()]
    }

    /// Returns whether the time source is tagged and not yet flushed.
    #[must_use]
    pub fn is_time_source_tagged(&self) -> bool {
        self.time_source_tagged
    }
}
