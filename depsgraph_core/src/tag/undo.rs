// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clearing and restoring recalc flags around undo steps.

use crate::datablock::Main;
use crate::graph::Depsgraph;
use crate::id::IdType;
use crate::recalc::RecalcFlags;
use crate::trace::{RecalcClearEvent, RecalcPass};

use super::hooks::TagHooks;

/// Clears the recalc flags accumulated in `graph` since the last clear.
///
/// With `backup`, the flags of each evaluated copy are first ORed into its
/// backup so [`ids_restore_recalc`] can bring them back. Only bits inside
/// [`RecalcFlags::ALL`] are cleared. Active graphs clear the original
/// data-blocks in `main` as well.
///
/// Does nothing when no data-block type was tagged since the last clear.
pub fn ids_clear_recalc(
    main: &mut Main,
    graph: &mut Depsgraph,
    backup: bool,
    hooks: &mut TagHooks<'_>,
) {
    if !graph.id_type_any_updated() {
        return;
    }
    let active = graph.is_active();
    for n in 0..graph.id_nodes.len() {
        let node = &mut graph.id_nodes[n];
        if backup {
            node.id_cow_recalc_backup |= node.cow.recalc;
        }
        node.is_user_modified = false;
        node.is_cow_explicitly_tagged = false;
        node.cow.recalc.remove(RecalcFlags::ALL);
        let id = node.id_orig;

        let tree = main.ntree_from_id(id);
        if let Some(tree) = tree
            && let Some(tree_node) = graph.find_id_node_mut(tree)
        {
            // The tree may come after its owner; back it up before stripping.
            if backup {
                tree_node.id_cow_recalc_backup |= tree_node.cow.recalc;
            }
            tree_node.cow.recalc.remove(RecalcFlags::ALL);
        }
        if active {
            main.clear_recalc(id, RecalcFlags::ALL);
            if let Some(tree) = tree {
                main.clear_recalc(tree, RecalcFlags::ALL);
            }
        }
    }
    graph.id_type_updated = [false; IdType::COUNT];

    if graph.debug.tag {
        hooks.tracer.recalc_clear(&RecalcClearEvent {
            graph: graph.registered_as,
            pass: if backup {
                RecalcPass::ClearWithBackup
            } else {
                RecalcPass::Clear
            },
            nodes: node_count(graph),
        });
    }
}

/// Merges each node's backup into its recalc flags and empties the backup.
pub fn ids_restore_recalc(graph: &mut Depsgraph, hooks: &mut TagHooks<'_>) {
    for node in &mut graph.id_nodes {
        node.cow.recalc |= node.id_cow_recalc_backup;
        node.id_cow_recalc_backup = RecalcFlags::NONE;
    }
    if graph.debug.tag {
        hooks.tracer.recalc_clear(&RecalcClearEvent {
            graph: graph.registered_as,
            pass: RecalcPass::Restore,
            nodes: node_count(graph),
        });
    }
}

fn node_count(graph: &Depsgraph) -> u32 {
    u32::try_from(graph.id_nodes.len()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use crate::config::DepsgraphConfig;
    use crate::id::{IdRef, ObjectType, ViewLayerId};
    use crate::node::{IdNode, NodeType, OperationCode};
    use crate::recalc::UpdateSource;
    use crate::tag::graph_id_tag_update;

    use super::*;

    fn setup(config: DepsgraphConfig) -> (Main, Depsgraph, IdRef) {
        let mut main = Main::new();
        let scene = main.add(IdType::Scene, "Scene");
        let object = main.add_object(ObjectType::Mesh, "Cube");
        let mut graph = Depsgraph::new(&main, scene, ViewLayerId(0), config);
        graph.add_id_node(&main, object);
        graph.add_operation(object, NodeType::Transform, OperationCode::TransformLocal);
        graph.add_operation(object, NodeType::CopyOnWrite, OperationCode::CopyOnWrite);
        (main, graph, object)
    }

    fn cow_recalc(graph: &Depsgraph, id: IdRef) -> RecalcFlags {
        graph.find_id_node(id).map(IdNode::cow_recalc).unwrap_or_default()
    }

    fn tag(main: &mut Main, graph: &mut Depsgraph, id: IdRef, flags: RecalcFlags) {
        graph_id_tag_update(main, Some(graph), id, flags, UpdateSource::UserEdit, &mut TagHooks::none());
    }

    #[test]
    fn clear_is_skipped_without_type_tags() {
        let (mut main, mut graph, object) = setup(DepsgraphConfig::viewport());
        if let Some(node) = graph.find_id_node_mut(object) {
            node.cow.recalc = RecalcFlags::SHADING;
        }
        ids_clear_recalc(&mut main, &mut graph, false, &mut TagHooks::none());
        assert_eq!(cow_recalc(&graph, object), RecalcFlags::SHADING);
    }

    #[test]
    fn backup_then_restore_round_trips() {
        let (mut main, mut graph, object) = setup(DepsgraphConfig::viewport());
        tag(&mut main, &mut graph, object, RecalcFlags::TRANSFORM | RecalcFlags::SHADING);
        if let Some(node) = graph.find_id_node_mut(object) {
            node.cow.recalc |= RecalcFlags::PROVISION_30;
        }
        let before = cow_recalc(&graph, object);

        ids_clear_recalc(&mut main, &mut graph, true, &mut TagHooks::none());
        assert_eq!(
            cow_recalc(&graph, object),
            RecalcFlags::PROVISION_30,
            "only bits inside ALL are cleared"
        );
        assert!(!graph.id_type_any_updated());
        let node = graph.find_id_node(object);
        assert!(!node.is_some_and(IdNode::is_user_modified));
        assert!(!node.is_some_and(IdNode::is_cow_explicitly_tagged));

        ids_restore_recalc(&mut graph, &mut TagHooks::none());
        assert_eq!(cow_recalc(&graph, object), before);
        assert_eq!(
            graph.find_id_node(object).map(IdNode::id_cow_recalc_backup),
            Some(RecalcFlags::NONE)
        );

        ids_restore_recalc(&mut graph, &mut TagHooks::none());
        assert_eq!(cow_recalc(&graph, object), before, "second restore adds nothing");
    }

    #[test]
    fn backups_accumulate() {
        let (mut main, mut graph, object) = setup(DepsgraphConfig::viewport());
        tag(&mut main, &mut graph, object, RecalcFlags::TRANSFORM);
        ids_clear_recalc(&mut main, &mut graph, true, &mut TagHooks::none());
        tag(&mut main, &mut graph, object, RecalcFlags::SHADING);
        ids_clear_recalc(&mut main, &mut graph, true, &mut TagHooks::none());

        let backup = graph.find_id_node(object).map(IdNode::id_cow_recalc_backup);
        assert!(backup.is_some_and(|b| b.contains(RecalcFlags::TRANSFORM | RecalcFlags::SHADING)));
    }

    #[test]
    fn active_graph_clears_originals() {
        let (mut main, mut graph, object) = setup(DepsgraphConfig::viewport());
        tag(&mut main, &mut graph, object, RecalcFlags::TRANSFORM);
        assert!(!main.recalc(object).is_empty());
        ids_clear_recalc(&mut main, &mut graph, false, &mut TagHooks::none());
        assert_eq!(main.recalc(object), RecalcFlags::NONE);
    }

    #[test]
    fn inactive_graph_keeps_originals() {
        let (mut main, mut graph, object) = setup(DepsgraphConfig::render());
        main.or_recalc(object, RecalcFlags::TRANSFORM);
        tag(&mut main, &mut graph, object, RecalcFlags::SHADING);
        ids_clear_recalc(&mut main, &mut graph, false, &mut TagHooks::none());
        assert_eq!(main.recalc(object), RecalcFlags::TRANSFORM);
        assert_eq!(cow_recalc(&graph, object), RecalcFlags::NONE);
    }

    #[test]
    fn embedded_tree_is_cleared_with_owner() {
        let mut main = Main::new();
        let scene = main.add(IdType::Scene, "Scene");
        let material = main.add(IdType::Material, "Metal");
        let tree = main.add(IdType::NodeTree, "Shader");
        main.set_node_tree(material, Some(tree));
        let mut graph = Depsgraph::new(&main, scene, ViewLayerId(0), DepsgraphConfig::viewport());
        graph.add_id_node(&main, material);
        graph.add_id_node(&main, tree);

        tag(&mut main, &mut graph, material, RecalcFlags::PARAMETERS);
        assert!(main.recalc(tree).contains(RecalcFlags::PARAMETERS));
        ids_clear_recalc(&mut main, &mut graph, false, &mut TagHooks::none());
        assert_eq!(cow_recalc(&graph, tree), RecalcFlags::NONE);
        assert_eq!(main.recalc(tree), RecalcFlags::NONE);
    }

    #[test]
    fn embedded_tree_survives_backup_and_restore() {
        let mut main = Main::new();
        let scene = main.add(IdType::Scene, "Scene");
        let material = main.add(IdType::Material, "Metal");
        let tree = main.add(IdType::NodeTree, "Shader");
        main.set_node_tree(material, Some(tree));
        let mut graph = Depsgraph::new(&main, scene, ViewLayerId(0), DepsgraphConfig::viewport());
        graph.add_id_node(&main, material);
        graph.add_id_node(&main, tree);

        tag(&mut main, &mut graph, material, RecalcFlags::PARAMETERS);
        let tree_before = cow_recalc(&graph, tree);
        let material_before = cow_recalc(&graph, material);
        assert!(
            tree_before.contains(RecalcFlags::PARAMETERS),
            "tag reached the embedded tree"
        );

        ids_clear_recalc(&mut main, &mut graph, true, &mut TagHooks::none());
        assert_eq!(cow_recalc(&graph, tree), RecalcFlags::NONE);

        ids_restore_recalc(&mut graph, &mut TagHooks::none());
        assert_eq!(cow_recalc(&graph, tree), tree_before, "tree flags restored");
        assert_eq!(cow_recalc(&graph, material), material_before);
    }
}
