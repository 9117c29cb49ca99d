// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry-wide forms of the tagging API.
//!
//! One data-block can be referenced by several graphs (one per viewport, a
//! render graph, ...). These entry points repeat the single-graph operation
//! for every registered graph built for the given [`Main`], in registration
//! order. Graphs own disjoint nodes, so the order does not affect the result.

use crate::datablock::Main;
use crate::graph::GraphRegistry;
use crate::id::{IdRef, IdType};
use crate::recalc::{RecalcFlags, UpdateSource};

use super::hooks::TagHooks;
use super::per_graph::{graph_id_type_tag, graph_time_tag_update};
use super::propagate::{graph_id_tag_update, recalc_flags_effective};
use super::visibility::graph_tag_on_visible_update;

impl GraphRegistry {
    /// Tags `id` with `flags` in every graph of `main`.
    ///
    /// Runs the graph-less pass first, then each graph. Finally the effective
    /// flags are accumulated on the data-block's undo-push recalc, which the
    /// undo system replays after an undo step.
    pub fn id_tag_update(
        &mut self,
        main: &mut Main,
        id: IdRef,
        flags: RecalcFlags,
        source: UpdateSource,
        hooks: &mut TagHooks<'_>,
    ) {
        if !main.is_alive(id) {
            return;
        }
        graph_id_tag_update(main, None, id, flags, source, hooks);
        for graph in self.graphs_for_main_mut(main.id()) {
            graph_id_tag_update(main, Some(graph), id, flags, source, hooks);
        }
        main.or_recalc_after_undo_push(id, recalc_flags_effective(None, flags));
    }

    /// Tags `id` with `flags` in every graph of `main`, as a user edit.
    pub fn tag_update(
        &mut self,
        main: &mut Main,
        id: IdRef,
        flags: RecalcFlags,
        hooks: &mut TagHooks<'_>,
    ) {
        self.id_tag_update(main, id, flags, UpdateSource::UserEdit, hooks);
    }

    /// Tags the time source of every graph of `main`.
    pub fn time_tag_update(&mut self, main: &Main) {
        for graph in self.graphs_for_main_mut(main.id()) {
            graph_time_tag_update(graph);
        }
    }

    /// Marks `id_type` as updated in every graph of `main`.
    pub fn id_type_tag(&mut self, main: &Main, id_type: IdType) {
        for graph in self.graphs_for_main_mut(main.id()) {
            graph_id_type_tag(graph, id_type);
        }
    }

    /// Requests a visibility pass on every graph of `main`.
    pub fn tag_on_visible_update(&mut self, main: &Main, do_time: bool) {
        for graph in self.graphs_for_main_mut(main.id()) {
            graph_tag_on_visible_update(graph, do_time);
        }
    }

    /// Requests a relations rebuild on every graph of `main`.
    pub fn relations_tag_update(&mut self, main: &Main) {
        for graph in self.graphs_for_main_mut(main.id()) {
            graph.tag_relations_update();
        }
    }
}
