// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flushing entry tags through relations.
//!
//! Flushing is the hand-off point to the evaluation engine: it turns the
//! entry tags recorded by tagging into the full set of operations that must
//! run, following relations from each tagged operation to everything
//! downstream of it.

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::dirty;
use crate::node::{NodeType, OperationFlags, OperationKey};
use crate::recalc::UpdateSource;

use super::Depsgraph;

impl Depsgraph {
    /// Flushes pending tags and returns every operation that needs an update.
    ///
    /// A pending time-source tag is consumed first by tagging every
    /// time-dependent operation. Then the entry channel is drained together
    /// with all operations reachable along relations. For each reached
    /// operation:
    ///
    /// - the operation is marked as needing an update;
    /// - its ID node is marked user-modified if the operation was tagged by a
    ///   user edit;
    /// - once per component, the component's implied recalc flags are added
    ///   to the evaluated copy and, except for particle components, every
    ///   operation of the component is marked as well.
    ///
    /// The returned keys are in ascending order.
    pub fn flush_updates(&mut self) -> Vec<OperationKey> {
        if self.time_source_tagged {
            self.time_source_tagged = false;
            for i in 0..self.time_dependents.len() {
                let key = self.time_dependents[i];
                self.tag_operation(key, UpdateSource::Time);
            }
        }

        let affected: Vec<u32> = self
            .relations
            .drain(dirty::ENTRY)
            .affected()
            .deterministic()
            .run()
            .collect();

        let mut handled: HashSet<(u32, NodeType)> = HashSet::new();
        let mut component_ops: Vec<OperationKey> = Vec::new();
        for &idx in &affected {
            let op = &mut self.operations[idx as usize];
            op.flags.needs_update = true;
            let (owner, kind) = (op.owner, op.component);
            let node = &mut self.id_nodes[owner as usize];
            if op.flags.user_modified {
                node.is_user_modified = true;
            }
            if !handled.insert((owner, kind)) {
                continue;
            }
            node.cow.recalc |= kind.id_recalc_tag();
            if matches!(kind, NodeType::ParticleSettings | NodeType::ParticleSystem) {
                continue;
            }
            if let Some(comp) = node.find_component(kind) {
                component_ops.extend(comp.operations());
            }
        }
        for key in component_ops {
            self.operations[key.0 as usize].flags.needs_update = true;
        }

        self.operations_needing_update().collect()
    }

    /// Resets the flags of every operation.
    ///
    /// Called by the evaluator once the flushed operations have run.
    pub fn clear_operation_tags(&mut self) {
        for op in &mut self.operations {
            op.flags = OperationFlags::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DepsgraphConfig;
    use crate::datablock::Main;
    use crate::id::{IdRef, IdType, ObjectType, ViewLayerId};
    use crate::node::OperationCode;
    use crate::recalc::RecalcFlags;

    use super::*;

    fn graph_with_object() -> (Main, Depsgraph, IdRef) {
        let mut main = Main::new();
        let scene = main.add(IdType::Scene, "Scene");
        let object = main.add_object(ObjectType::Mesh, "Cube");
        let mut graph = Depsgraph::new(&main, scene, ViewLayerId(0), DepsgraphConfig::viewport());
        graph.add_id_node(&main, object);
        (main, graph, object)
    }

    #[test]
    fn flush_follows_relations() {
        let (_main, mut graph, object) = graph_with_object();
        let xform = graph.add_operation(object, NodeType::Transform, OperationCode::TransformFinal);
        let geom = graph.add_operation(object, NodeType::Geometry, OperationCode::GeometryEval);
        let shade = graph.add_operation(object, NodeType::Shading, OperationCode::Shading);
        graph.add_relation(xform, geom).expect("acyclic");

        graph.tag_operation(xform, UpdateSource::UserEdit);
        let flushed = graph.flush_updates();

        assert_eq!(flushed, [xform, geom]);
        assert!(!graph.operation(shade).needs_update());
        assert!(!graph.operation(geom).flags().directly_modified);
        let node = graph.find_id_node(object).expect("node exists");
        assert!(node.is_user_modified());
        assert!(
            node.cow_recalc()
                .contains(RecalcFlags::TRANSFORM | RecalcFlags::GEOMETRY),
            "flushed components add their implied flags"
        );
        assert!(!node.cow_recalc().contains(RecalcFlags::SHADING));
    }

    #[test]
    fn time_source_reaches_time_dependents() {
        let (_main, mut graph, object) = graph_with_object();
        let anim = graph.add_operation(object, NodeType::Animation, OperationCode::AnimationEval);
        let xform = graph.add_operation(object, NodeType::Transform, OperationCode::TransformLocal);
        graph.add_time_dependency(anim);
        graph.add_relation(anim, xform).expect("acyclic");

        graph.time_source_tagged = true;
        let flushed = graph.flush_updates();
        assert_eq!(flushed, [anim, xform]);
        assert!(!graph.is_time_source_tagged());
        assert!(
            !graph.find_id_node(object).expect("node exists").is_user_modified(),
            "time updates are not user edits"
        );
    }

    #[test]
    fn clear_resets_flags() {
        let (_main, mut graph, object) = graph_with_object();
        let xform = graph.add_operation(object, NodeType::Transform, OperationCode::TransformLocal);
        graph.tag_operation(xform, UpdateSource::UserEdit);
        let _ = graph.flush_updates();
        graph.clear_operation_tags();
        assert_eq!(graph.operations_needing_update().count(), 0);
        assert!(graph.flush_updates().is_empty(), "entry channel was drained");
    }
}
