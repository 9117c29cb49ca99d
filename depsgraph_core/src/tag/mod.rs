// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Update tagging: from "this data-block changed" to tagged operations.
//!
//! The entry points come in two forms. Single-graph functions take the
//! [`Depsgraph`](crate::graph::Depsgraph) explicitly; registry-wide forms are
//! methods on [`GraphRegistry`](crate::graph::GraphRegistry) and repeat the
//! operation for every graph of a [`Main`](crate::datablock::Main).
//! [`Session`](crate::session::Session) wraps the latter for hosts that keep a
//! single database.
//!
//! No entry point returns an error. Stale handles, missing nodes and
//! inapplicable `(type, flag)` pairs are silently skipped.

mod classify;
mod fanout;
mod hooks;
mod per_graph;
mod propagate;
mod undo;
mod visibility;

pub use classify::{component_and_opcode, geometry_tag_to_component};
pub use hooks::TagHooks;
pub use per_graph::{
    editors_update, enable_editors_update, graph_id_type_tag, graph_tag_update,
    graph_time_tag_update,
};
pub use propagate::{graph_id_tag_update, recalc_flags_effective};
pub use undo::{ids_clear_recalc, ids_restore_recalc};
pub use visibility::{graph_tag_ids_for_visible_update, graph_tag_on_visible_update};
