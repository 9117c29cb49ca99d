// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editor notification contract.
//!
//! Editors (viewports, property panels, outliners) live outside this crate.
//! They implement [`EditorNotifier`] to hear about changes synchronously:
//! [`id_update`](EditorNotifier::id_update) fires while a tag carrying
//! [`EDITORS`](crate::recalc::RecalcFlags::EDITORS) is processed on an
//! active graph, and [`scene_update`](EditorNotifier::scene_update) fires from
//! [`editors_update`](crate::tag::editors_update).
//!
//! Notifications are never deferred: the callback runs before the tagging
//! call returns.

use crate::graph::GraphId;
use crate::id::{IdRef, MainId, ViewLayerId};

/// Context handed to editor callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorUpdateContext {
    /// Database the change happened in.
    pub main: MainId,
    /// Graph that observed the change, if registered.
    pub graph: Option<GraphId>,
    /// Input scene of that graph.
    pub scene: IdRef,
    /// Input view layer of that graph.
    pub view_layer: ViewLayerId,
}

/// Receives synchronous editor notifications.
pub trait EditorNotifier {
    /// Called when `id` is tagged with `EDITORS` on an active graph.
    fn id_update(&mut self, ctx: &EditorUpdateContext, id: IdRef);

    /// Called from [`editors_update`](crate::tag::editors_update).
    ///
    /// `updated` is true when time changed or any data-block type was tagged
    /// since the last clear.
    fn scene_update(&mut self, ctx: &EditorUpdateContext, updated: bool) {
        _ = (ctx, updated);
    }
}
