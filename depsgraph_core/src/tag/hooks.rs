// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side channels of a tagging call.

use crate::editors::EditorNotifier;
use crate::trace::Tracer;

/// The collaborators a tagging call may reach besides the graph itself.
///
/// Both are optional. Without an editor notifier, `EDITORS` tags are still
/// accepted but nobody hears about them.
pub struct TagHooks<'a> {
    pub(crate) editors: Option<&'a mut dyn EditorNotifier>,
    pub(crate) tracer: Tracer<'a>,
}

impl core::fmt::Debug for TagHooks<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TagHooks")
            .field("editors", &self.editors.is_some())
            .field("tracer", &self.tracer)
            .finish()
    }
}

impl Default for TagHooks<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl<'a> TagHooks<'a> {
    /// No editor notifier, no tracing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            editors: None,
            tracer: Tracer::none(),
        }
    }

    /// Routes editor notifications to `editors`.
    #[must_use]
    pub fn with_editors(mut self, editors: &'a mut dyn EditorNotifier) -> Self {
        self.editors = Some(editors);
        self
    }

    /// Routes trace events through `tracer`.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer<'a>) -> Self {
        self.tracer = tracer;
        self
    }
}
