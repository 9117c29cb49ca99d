// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for depsgraph tag
//! diagnostics.
//!
//! This crate provides [`TraceSink`](depsgraph_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export`]: writes JSON lines from recorded bytes.
//!
//! Sinks only see events from graphs whose
//! [`DebugFlags::tag`](depsgraph_core::config::DebugFlags::tag) is set.

pub mod json;
pub mod pretty;
pub mod recorder;
