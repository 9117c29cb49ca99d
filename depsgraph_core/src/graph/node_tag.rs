// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node-level tagging primitives.
//!
//! These mark operations as needing an update and record entry tags for the
//! flush. They know nothing about recalc flags; the propagator in
//! [`tag`](crate::tag) decides which nodes to tag.

use understory_dirty::EagerPolicy;

use crate::dirty;
use crate::id::IdRef;
use crate::node::{NodeType, OperationKey};
use crate::recalc::UpdateSource;

use super::Depsgraph;

impl Depsgraph {
    /// Tags a single operation for update and records an entry tag for it.
    ///
    /// The operation is re-tagged even when it already needs an update, so
    /// that the flush sees the entry again.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not belong to this graph.
    pub fn tag_operation(&mut self, key: OperationKey, source: UpdateSource) {
        let op = &mut self.operations[key.0 as usize];
        op.flags.needs_update = true;
        op.flags.directly_modified = true;
        if source == UpdateSource::UserEdit {
            op.flags.user_modified = true;
        }
        self.relations.mark_with(key.0, dirty::ENTRY, &EagerPolicy);
    }

    /// Tags every operation of component `kind` of `id`.
    ///
    /// Does nothing when the node or component is missing, or when the
    /// component's entry operation already needs an update.
    pub fn tag_component(&mut self, id: IdRef, kind: NodeType, source: UpdateSource) {
        let Some(node) = self.id_node_index(id) else {
            return;
        };
        if let Some(comp) = self.id_nodes[node as usize].component_index(kind) {
            self.tag_component_at(node, comp, source);
        }
    }

    /// Tags every component of `id`.
    ///
    /// The animation component is skipped for relation updates: those
    /// schedule animation explicitly when needed, and re-running it would
    /// discard unkeyed edits.
    pub fn tag_id_node(&mut self, id: IdRef, source: UpdateSource) {
        if let Some(node) = self.id_node_index(id) {
            self.tag_id_node_at(node, source);
        }
    }

    pub(crate) fn tag_component_at(&mut self, node: u32, comp: usize, source: UpdateSource) {
        let component = &self.id_nodes[node as usize].components[comp];
        if let Some(entry) = component.entry_operation()
            && self.operations[entry.0 as usize].flags.needs_update
        {
            return;
        }
        let count = component.operations.len();
        for i in 0..count {
            let (_, key) = self.id_nodes[node as usize].components[comp].operations[i];
            self.tag_operation(key, source);
        }
    }

    pub(crate) fn tag_id_node_at(&mut self, node: u32, source: UpdateSource) {
        let count = self.id_nodes[node as usize].components.len();
        for comp in 0..count {
            let kind = self.id_nodes[node as usize].components[comp].kind;
            if kind == NodeType::Animation && source == UpdateSource::Relations {
                continue;
            }
            self.tag_component_at(node, comp, source);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DepsgraphConfig;
    use crate::datablock::Main;
    use crate::id::{IdType, ObjectType, ViewLayerId};
    use crate::node::OperationCode;

    use super::*;

    #[test]
    fn entry_operation_short_circuits_component_tag() {
        let mut main = Main::new();
        let scene = main.add(IdType::Scene, "Scene");
        let object = main.add_object(ObjectType::Mesh, "Cube");
        let mut graph = Depsgraph::new(&main, scene, ViewLayerId(0), DepsgraphConfig::viewport());
        graph.add_id_node(&main, object);
        let local = graph.add_operation(object, NodeType::Transform, OperationCode::TransformLocal);
        let fin = graph.add_operation(object, NodeType::Transform, OperationCode::TransformFinal);
        graph.set_entry_operation(local);

        graph.tag_operation(local, UpdateSource::Time);
        graph.tag_component(object, NodeType::Transform, UpdateSource::UserEdit);

        assert!(
            !graph.operation(fin).needs_update(),
            "component tag stops at an already tagged entry"
        );
        assert!(!graph.operation(local).flags().user_modified);
    }

    #[test]
    fn relations_source_skips_animation() {
        let mut main = Main::new();
        let scene = main.add(IdType::Scene, "Scene");
        let object = main.add_object(ObjectType::Empty, "Empty");
        let mut graph = Depsgraph::new(&main, scene, ViewLayerId(0), DepsgraphConfig::viewport());
        graph.add_id_node(&main, object);
        let anim = graph.add_operation(object, NodeType::Animation, OperationCode::AnimationEval);
        let xform = graph.add_operation(object, NodeType::Transform, OperationCode::TransformLocal);

        graph.tag_id_node(object, UpdateSource::Relations);
        assert!(!graph.operation(anim).needs_update());
        assert!(graph.operation(xform).needs_update());

        graph.tag_id_node(object, UpdateSource::Time);
        assert!(graph.operation(anim).needs_update());
    }

    #[test]
    fn user_edit_marks_user_modified() {
        let mut main = Main::new();
        let scene = main.add(IdType::Scene, "Scene");
        let object = main.add_object(ObjectType::Empty, "Empty");
        let mut graph = Depsgraph::new(&main, scene, ViewLayerId(0), DepsgraphConfig::viewport());
        graph.add_id_node(&main, object);
        let xform = graph.add_operation(object, NodeType::Transform, OperationCode::TransformLocal);
        graph.tag_operation(xform, UpdateSource::UserEdit);
        let flags = graph.operation(xform).flags();
        assert!(flags.needs_update && flags.directly_modified && flags.user_modified);
    }
}
