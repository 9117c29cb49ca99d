// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for update tagging.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! tag propagator calls. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Events are only produced for graphs whose
//! [`DebugFlags::tag`](crate::config::DebugFlags::tag) is set (or, for the
//! graph-less pass, when the database's debug flags have it set).

use crate::graph::GraphId;
use crate::id::IdRef;
use crate::recalc::{RecalcFlags, UpdateSource};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every top-level tag request that reaches a graph (or the
/// graph-less pass).
#[derive(Clone, Copy, Debug)]
pub struct TagUpdateEvent<'a> {
    /// Graph being tagged, or `None` for the graph-less pass and unregistered
    /// graphs.
    pub graph: Option<GraphId>,
    /// Tagged data-block.
    pub id: IdRef,
    /// Full name of the data-block (e.g. `OBCube`).
    pub name: &'a str,
    /// Requested flags; empty is the legacy request.
    pub flags: RecalcFlags,
    /// Where the request came from.
    pub source: UpdateSource,
}

/// Emitted when a tag request is dropped because the graph is evaluating.
#[derive(Clone, Copy, Debug)]
pub struct TagDroppedEvent<'a> {
    /// Graph that was evaluating.
    pub graph: Option<GraphId>,
    /// Data-block of the dropped request.
    pub id: IdRef,
    /// Full name of the data-block.
    pub name: &'a str,
    /// Flags of the dropped request.
    pub flags: RecalcFlags,
    /// Source of the dropped request.
    pub source: UpdateSource,
}

/// Emitted when the visibility pass re-tags a data-block.
#[derive(Clone, Copy, Debug)]
pub struct VisibleRetagEvent<'a> {
    /// Graph running the pass.
    pub graph: Option<GraphId>,
    /// Re-tagged data-block.
    pub id: IdRef,
    /// Full name of the data-block.
    pub name: &'a str,
    /// Flags the pass tagged with.
    pub flags: RecalcFlags,
}

/// Which recalc bookkeeping pass ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecalcPass {
    /// Recalc flags were cleared.
    Clear,
    /// Recalc flags were saved to the backup, then cleared.
    ClearWithBackup,
    /// The backup was merged back into the recalc flags.
    Restore,
}

/// Emitted after a recalc clear or restore pass over a graph.
#[derive(Clone, Copy, Debug)]
pub struct RecalcClearEvent {
    /// Graph the pass ran on.
    pub graph: Option<GraphId>,
    /// Which pass ran.
    pub pass: RecalcPass,
    /// Number of ID nodes visited.
    pub nodes: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the tag propagator.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for every top-level tag request.
    fn on_tag_update(&mut self, e: &TagUpdateEvent<'_>) {
        _ = e;
    }

    /// Called when a tag request is dropped during evaluation.
    fn on_tag_dropped(&mut self, e: &TagDroppedEvent<'_>) {
        _ = e;
    }

    /// Called when the visibility pass re-tags a data-block.
    fn on_visible_retag(&mut self, e: &VisibleRetagEvent<'_>) {
        _ = e;
    }

    /// Called after a recalc clear or restore pass.
    fn on_recalc_clear(&mut self, e: &RecalcClearEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TagUpdateEvent`].
    #[inline]
    pub fn tag_update(&mut self, e: &TagUpdateEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tag_update(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TagDroppedEvent`].
    #[inline]
    pub fn tag_dropped(&mut self, e: &TagDroppedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tag_dropped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`VisibleRetagEvent`].
    #[inline]
    pub fn visible_retag(&mut self, e: &VisibleRetagEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_visible_retag(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RecalcClearEvent`].
    #[inline]
    pub fn recalc_clear(&mut self, e: &RecalcClearEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_recalc_clear(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
