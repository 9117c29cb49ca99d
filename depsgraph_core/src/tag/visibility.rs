// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred re-tagging of data-blocks whose visibility changed.
//!
//! Requests only set two flags on the graph, so repeated requests within one
//! logic step coalesce. The pass itself runs once, right before evaluation.

use crate::datablock::Main;
use crate::graph::Depsgraph;
use crate::id::IdType;
use crate::recalc::{RecalcFlags, UpdateSource};
use crate::trace::VisibleRetagEvent;

use super::hooks::TagHooks;
use super::propagate::graph_id_tag_update;

/// Requests a visibility pass on `graph`.
///
/// `do_time` is sticky: once a request carried a frame change, the pending
/// pass keeps it until consumed.
pub fn graph_tag_on_visible_update(graph: &mut Depsgraph, do_time: bool) {
    graph.need_tag_id_on_graph_visibility_update = true;
    graph.need_tag_id_on_graph_visibility_time_update |= do_time;
}

/// Runs the pending visibility pass on `graph`, if any.
///
/// Nodes with nothing visible are skipped. A node whose evaluated copy was
/// never expanded gets a copy-on-write tag (plus animation on frame changes,
/// when the data-block is animated). An expanded node is only re-tagged when
/// its visibility mask changed since the previous pass. Objects always get
/// transform and geometry on top.
pub fn graph_tag_ids_for_visible_update(
    main: &mut Main,
    graph: &mut Depsgraph,
    hooks: &mut TagHooks<'_>,
) {
    if !graph.need_tag_id_on_graph_visibility_update {
        return;
    }
    let do_time = graph.need_tag_id_on_graph_visibility_time_update;

    for n in 0..graph.id_nodes.len() {
        let node = &graph.id_nodes[n];
        if node.visible_components_mask == 0 {
            continue;
        }
        let id = node.id_orig;
        let id_type = node.id_type;
        let mut flags = RecalcFlags::NONE;
        if !node.cow.expanded {
            flags |= RecalcFlags::COPY_ON_WRITE;
            if do_time && main.has_animation_data(id) {
                flags |= RecalcFlags::ANIMATION;
            }
        } else if node.visible_components_mask == node.previously_visible_components_mask {
            // Blanket re-tagging would throw away caches such as bakes.
            continue;
        }
        if id_type == IdType::Object {
            flags |= RecalcFlags::TRANSFORM | RecalcFlags::GEOMETRY;
        }
        graph_id_tag_update(
            main,
            Some(&mut *graph),
            id,
            flags,
            UpdateSource::Visibility,
            hooks,
        );
        if id_type == IdType::Scene {
            // Collection visibility flags live on the scene.
            #[expect(
                clippy::cast_possible_truncation,
                reason = "node count is bounded by u32 in add_id_node"
            )]
            let node = n as u32;
            graph.tag_id_node_at(node, UpdateSource::Visibility);
        }
        let node = &mut graph.id_nodes[n];
        node.previously_visible_components_mask = node.visible_components_mask;

        if graph.debug.tag
            && let Some(block) = main.get(id)
        {
            hooks.tracer.visible_retag(&VisibleRetagEvent {
                graph: graph.registered_as,
                id,
                name: block.name(),
                flags,
            });
        }
    }

    graph.need_tag_id_on_graph_visibility_update = false;
    graph.need_tag_id_on_graph_visibility_time_update = false;
}
