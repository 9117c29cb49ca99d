// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node and relation storage API for graph builders.
//!
//! This is storage only. Deciding which nodes and relations a scene needs is
//! the builder's job and lives outside this crate.

use crate::datablock::Main;
use crate::id::IdRef;
use crate::node::{
    ComponentNode, IdNode, NodeType, OperationCode, OperationFlags, OperationKey, OperationNode,
};

use super::Depsgraph;
use crate::dirty;

/// Errors reported when adding a relation between operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RelationError {
    /// The operation handle does not belong to this graph.
    #[error("unknown operation {0:?}")]
    UnknownOperation(OperationKey),
    /// The relation would close a cycle.
    #[error("relation {from:?} -> {to:?} would create a cycle")]
    Cycle {
        /// Source operation.
        from: OperationKey,
        /// Target operation.
        to: OperationKey,
    },
}

impl Depsgraph {
    /// Adds an ID node for `id`. Adding an existing node is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `main` is not the database this graph was created for or if
    /// `id` is stale.
    pub fn add_id_node(&mut self, main: &Main, id: IdRef) {
        assert!(
            main.id() == self.main,
            "data-block belongs to a different database"
        );
        if self.id_lookup.contains_key(&id) {
            return;
        }
        let id_type = main.block(id).id_type();
        let idx = u32::try_from(self.id_nodes.len()).unwrap_or(u32::MAX);
        assert!(idx != u32::MAX, "ID node slots exhausted");
        self.id_nodes.push(IdNode::new(id, id_type));
        self.id_lookup.insert(id, idx);
        self.id_type_exist[id_type.index()] = true;
    }

    /// Adds component `kind` to the node of `id`. Adding an existing
    /// component is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no node in this graph or `kind` is not a component
    /// type.
    pub fn add_component(&mut self, id: IdRef, kind: NodeType) {
        assert!(kind.is_component(), "{kind} is not a component type");
        let node = self.node_for_build(id);
        if node.component_index(kind).is_none() {
            node.components.push(ComponentNode::new(kind));
        }
    }

    /// Adds operation `opcode` to component `kind` of `id`, creating the
    /// component if needed, and returns its handle.
    ///
    /// Adding an existing operation returns the existing handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no node in this graph or `kind` is not a component
    /// type.
    pub fn add_operation(
        &mut self,
        id: IdRef,
        kind: NodeType,
        opcode: OperationCode,
    ) -> OperationKey {
        self.add_component(id, kind);
        let owner = self.id_lookup[&id];
        let comp_idx = self.id_nodes[owner as usize]
            .component_index(kind)
            .unwrap_or_else(|| unreachable!("component was just added"));
        let comp = &self.id_nodes[owner as usize].components[comp_idx];
        if let Some(key) = comp.find_operation(opcode) {
            return key;
        }

        let idx = u32::try_from(self.operations.len()).unwrap_or(u32::MAX);
        assert!(idx != u32::MAX, "operation slots exhausted");
        let key = OperationKey(idx);
        self.operations.push(OperationNode {
            owner,
            component: kind,
            opcode,
            flags: OperationFlags::default(),
        });
        self.id_nodes[owner as usize].components[comp_idx]
            .operations
            .push((opcode, key));
        key
    }

    /// Makes `key` the entry operation of its component.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not belong to this graph.
    pub fn set_entry_operation(&mut self, key: OperationKey) {
        let op = &self.operations[key.0 as usize];
        let (owner, kind) = (op.owner, op.component);
        let node = &mut self.id_nodes[owner as usize];
        if let Some(comp_idx) = node.component_index(kind) {
            node.components[comp_idx].entry_operation = Some(key);
        }
    }

    /// Adds a relation: `to` must be re-evaluated whenever `from` is.
    ///
    /// Returns `Ok(true)` if the relation is new and `Ok(false)` if it
    /// already existed.
    pub fn add_relation(
        &mut self,
        from: OperationKey,
        to: OperationKey,
    ) -> Result<bool, RelationError> {
        for key in [from, to] {
            if key.0 as usize >= self.operations.len() {
                return Err(RelationError::UnknownOperation(key));
            }
        }
        self.relations
            .add_dependency(to.0, from.0, dirty::ENTRY)
            .map_err(|_| RelationError::Cycle { from, to })
    }

    /// Makes `key` re-evaluate whenever the time source is tagged.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not belong to this graph.
    pub fn add_time_dependency(&mut self, key: OperationKey) {
        assert!(
            (key.0 as usize) < self.operations.len(),
            "unknown operation {key:?}"
        );
        if !self.time_dependents.contains(&key) {
            self.time_dependents.push(key);
        }
    }

    fn node_for_build(&mut self, id: IdRef) -> &mut IdNode {
        let Some(&idx) = self.id_lookup.get(&id) else {
            panic!("{id:?} has no node in this graph");
        };
        &mut self.id_nodes[idx as usize]
    }
}
