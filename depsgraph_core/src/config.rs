// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph configuration presets and runtime debug flags.

/// Runtime debug switches.
///
/// These gate diagnostics only; they never change tagging results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DebugFlags {
    /// Report every top-level tag request and every dropped request to the
    /// attached [`TraceSink`](crate::trace::TraceSink).
    pub tag: bool,
}

impl DebugFlags {
    /// All debug output disabled.
    pub const NONE: Self = Self { tag: false };

    /// Tag logging enabled.
    pub const TAG: Self = Self { tag: true };
}

/// Configuration for a [`Depsgraph`](crate::graph::Depsgraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DepsgraphConfig {
    /// Whether the graph starts active.
    ///
    /// Only active graphs notify editors, write user-edit flags back to the
    /// original data-blocks and clear original recalc flags.
    pub active: bool,
    /// Whether [`editors_update`](crate::tag::editors_update) reaches the
    /// editor notifier for this graph.
    pub editors_update: bool,
    /// Debug switches.
    pub debug: DebugFlags,
}

impl DepsgraphConfig {
    /// Interactive viewport graph: active, with editor updates.
    #[must_use]
    pub const fn viewport() -> Self {
        Self {
            active: true,
            editors_update: true,
            debug: DebugFlags::NONE,
        }
    }

    /// Final render or background graph: inactive, no editor updates.
    #[must_use]
    pub const fn render() -> Self {
        Self {
            active: false,
            editors_update: false,
            debug: DebugFlags::NONE,
        }
    }

    /// Returns this configuration with the given debug flags.
    #[must_use]
    pub const fn with_debug(mut self, debug: DebugFlags) -> Self {
        self.debug = debug;
        self
    }
}

impl Default for DepsgraphConfig {
    fn default() -> Self {
        Self::viewport()
    }
}
