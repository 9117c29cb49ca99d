// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-graph entry points besides the propagator itself.

use crate::datablock::Main;
use crate::editors::EditorUpdateContext;
use crate::graph::Depsgraph;
use crate::id::{IdRef, IdType};
use crate::recalc::{RecalcFlags, UpdateSource};

use super::hooks::TagHooks;
use super::propagate::graph_id_tag_update;

/// Tags `id` in `graph` as a user edit.
pub fn graph_tag_update(
    main: &mut Main,
    graph: &mut Depsgraph,
    id: IdRef,
    flags: RecalcFlags,
    hooks: &mut TagHooks<'_>,
) {
    graph_id_tag_update(main, Some(graph), id, flags, UpdateSource::UserEdit, hooks);
}

/// Marks data-blocks of type `id_type` as updated in `graph`.
///
/// Node trees can be embedded in other data-blocks, so tagging the node tree
/// type also marks every type that can embed one.
pub fn graph_id_type_tag(graph: &mut Depsgraph, id_type: IdType) {
    if id_type == IdType::NodeTree {
        for owner in IdType::ALL.into_iter().filter(|ty| ty.can_embed_node_tree()) {
            graph.id_type_updated[owner.index()] = true;
        }
    }
    graph.id_type_updated[id_type.index()] = true;
}

/// Tags the time source of `graph`.
///
/// The time-dependent operations are reached on the next
/// [`flush_updates`](Depsgraph::flush_updates).
pub fn graph_time_tag_update(graph: &mut Depsgraph) {
    graph.time_source_tagged = true;
}

/// Turns on editor updates for `graph`.
pub fn enable_editors_update(graph: &mut Depsgraph) {
    graph.use_editors_update = true;
}

/// Tells editors that the scene of `graph` may have changed.
///
/// Does nothing unless editor updates are enabled on the graph. The
/// notifier hears `updated == true` when `time` is set or any data-block type
/// was tagged since the last clear.
pub fn editors_update(graph: &Depsgraph, time: bool, hooks: &mut TagHooks<'_>) {
    if !graph.use_editors_update() {
        return;
    }
    let Some(editors) = &mut hooks.editors else {
        return;
    };
    let ctx = EditorUpdateContext {
        main: graph.main_id(),
        graph: graph.registered_as(),
        scene: graph.scene(),
        view_layer: graph.view_layer(),
    };
    editors.scene_update(&ctx, time || graph.id_type_any_updated());
}
