// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-database convenience owner.
//!
//! [`Session`] bundles a [`Main`], the [`GraphRegistry`] of graphs built for
//! it, and the optional editor notifier and trace sink. Its methods are the
//! "main-implicit" forms of the tagging API: they fan out over every graph of
//! the owned database and build the [`TagHooks`] for each call.

use alloc::boxed::Box;

use crate::config::DepsgraphConfig;
use crate::datablock::Main;
use crate::editors::EditorNotifier;
use crate::graph::{Depsgraph, GraphId, GraphRegistry};
use crate::id::{IdRef, IdType, ViewLayerId};
use crate::recalc::{RecalcFlags, UpdateSource};
use crate::tag::{self, TagHooks};
use crate::trace::{TraceSink, Tracer};

/// A database, its graphs and the tagging side channels.
#[derive(Default)]
pub struct Session {
    main: Main,
    registry: GraphRegistry,
    editors: Option<Box<dyn EditorNotifier>>,
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("main", &self.main.id())
            .field("graphs", &self.registry.len())
            .field("editors", &self.editors.is_some())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

fn make_hooks<'a>(
    editors: &'a mut Option<Box<dyn EditorNotifier>>,
    sink: &'a mut Option<Box<dyn TraceSink>>,
) -> TagHooks<'a> {
    let mut hooks = TagHooks::none();
    if let Some(editors) = editors {
        hooks = hooks.with_editors(&mut **editors);
    }
    if let Some(sink) = sink {
        hooks = hooks.with_tracer(Tracer::new(&mut **sink));
    }
    hooks
}

impl Session {
    /// Creates a session around an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::with_main(Main::new())
    }

    /// Creates a session around an existing database.
    #[must_use]
    pub fn with_main(main: Main) -> Self {
        Self {
            main,
            registry: GraphRegistry::new(),
            editors: None,
            sink: None,
        }
    }

    /// Returns the database.
    #[must_use]
    pub fn main(&self) -> &Main {
        &self.main
    }

    /// Returns the database for editing.
    ///
    /// Structural edits go through here; tag the edited data-blocks
    /// afterwards with [`id_tag_update`](Self::id_tag_update).
    pub fn main_mut(&mut self) -> &mut Main {
        &mut self.main
    }

    /// Returns the graph registry.
    #[must_use]
    pub fn registry(&self) -> &GraphRegistry {
        &self.registry
    }

    /// Returns the graph registry for building and registering graphs.
    pub fn registry_mut(&mut self) -> &mut GraphRegistry {
        &mut self.registry
    }

    /// Installs the editor notifier, returning the previous one.
    pub fn set_editor_notifier(
        &mut self,
        editors: Option<Box<dyn EditorNotifier>>,
    ) -> Option<Box<dyn EditorNotifier>> {
        core::mem::replace(&mut self.editors, editors)
    }

    /// Installs the trace sink, returning the previous one.
    ///
    /// Events only reach the sink with the `trace` feature enabled and
    /// [`DebugFlags::tag`](crate::config::DebugFlags::tag) set on the graph.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) -> Option<Box<dyn TraceSink>> {
        core::mem::replace(&mut self.sink, sink)
    }

    // -- Graphs --

    /// Creates and registers a graph for `scene` and `view_layer`.
    ///
    /// # Panics
    ///
    /// Panics if `scene` is stale or not a scene.
    pub fn add_graph(
        &mut self,
        scene: IdRef,
        view_layer: ViewLayerId,
        config: DepsgraphConfig,
    ) -> GraphId {
        let graph = Depsgraph::new(&self.main, scene, view_layer, config);
        self.registry.register(graph)
    }

    /// Returns a registered graph.
    #[must_use]
    pub fn graph(&self, id: GraphId) -> Option<&Depsgraph> {
        self.registry.get(id)
    }

    /// Returns a registered graph for editing.
    pub fn graph_mut(&mut self, id: GraphId) -> Option<&mut Depsgraph> {
        self.registry.get_mut(id)
    }

    // -- Registry-wide tagging --

    /// Tags `id` with `flags` in every graph, as a user edit.
    pub fn id_tag_update(&mut self, id: IdRef, flags: RecalcFlags) {
        self.id_tag_update_from(id, flags, UpdateSource::UserEdit);
    }

    /// Tags `id` with `flags` in every graph, from `source`.
    pub fn id_tag_update_from(&mut self, id: IdRef, flags: RecalcFlags, source: UpdateSource) {
        let mut hooks = make_hooks(&mut self.editors, &mut self.sink);
        self.registry
            .id_tag_update(&mut self.main, id, flags, source, &mut hooks);
    }

    /// Tags the time source of every graph.
    pub fn time_tag_update(&mut self) {
        self.registry.time_tag_update(&self.main);
    }

    /// Marks `id_type` as updated in every graph.
    pub fn id_type_tag(&mut self, id_type: IdType) {
        self.registry.id_type_tag(&self.main, id_type);
    }

    /// Requests a visibility pass on every graph.
    pub fn tag_on_visible_update(&mut self, do_time: bool) {
        self.registry.tag_on_visible_update(&self.main, do_time);
    }

    /// Requests a relations rebuild on every graph.
    pub fn relations_tag_update(&mut self) {
        self.registry.relations_tag_update(&self.main);
    }

    // -- Single-graph operations --
    //
    // Unknown graph handles are ignored.

    /// Tags `id` with `flags` in one graph, as a user edit.
    pub fn graph_tag_update(&mut self, graph: GraphId, id: IdRef, flags: RecalcFlags) {
        let Some(graph) = self.registry.get_mut(graph) else {
            return;
        };
        let mut hooks = make_hooks(&mut self.editors, &mut self.sink);
        tag::graph_tag_update(&mut self.main, graph, id, flags, &mut hooks);
    }

    /// Runs the pending visibility pass of one graph.
    pub fn graph_tag_ids_for_visible_update(&mut self, graph: GraphId) {
        let Some(graph) = self.registry.get_mut(graph) else {
            return;
        };
        let mut hooks = make_hooks(&mut self.editors, &mut self.sink);
        tag::graph_tag_ids_for_visible_update(&mut self.main, graph, &mut hooks);
    }

    /// Notifies editors about a possible scene change in one graph.
    pub fn editors_update(&mut self, graph: GraphId, time: bool) {
        let Some(graph) = self.registry.get(graph) else {
            return;
        };
        let mut hooks = make_hooks(&mut self.editors, &mut self.sink);
        tag::editors_update(graph, time, &mut hooks);
    }

    /// Clears the recalc flags of one graph, optionally backing them up.
    pub fn ids_clear_recalc(&mut self, graph: GraphId, backup: bool) {
        let Some(graph) = self.registry.get_mut(graph) else {
            return;
        };
        let mut hooks = make_hooks(&mut self.editors, &mut self.sink);
        tag::ids_clear_recalc(&mut self.main, graph, backup, &mut hooks);
    }

    /// Restores the recalc flags backed up by
    /// [`ids_clear_recalc`](Self::ids_clear_recalc).
    pub fn ids_restore_recalc(&mut self, graph: GraphId) {
        let Some(graph) = self.registry.get_mut(graph) else {
            return;
        };
        let mut hooks = make_hooks(&mut self.editors, &mut self.sink);
        tag::ids_restore_recalc(graph, &mut hooks);
    }
}
