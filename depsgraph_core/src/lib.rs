// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Update tagging and propagation for per-data-block dependency graphs.
//!
//! `depsgraph_core` decides, given a mutation to a data-block, which
//! downstream evaluation operations must be re-run, and marks them in every
//! dependency graph that references the data-block. It is `no_std`
//! compatible (with `alloc`) and stores nodes in flat arrays addressed by
//! index handles.
//!
//! # Architecture
//!
//! ```text
//!   caller edit ──► RecalcFlags ──► GraphRegistry::id_tag_update()
//!                                         │  (once graph-less, then per graph)
//!                                         ▼
//!                      tag::graph_id_tag_update() ──► classify (component, opcode)
//!                                         │
//!                                         ▼
//!                     IdNode / ComponentNode / OperationNode tagged
//!                                         │
//!                                         ▼
//!                      Depsgraph::flush_updates() ──► evaluation engine
//! ```
//!
//! **[`recalc`]**: The [`RecalcFlags`](recalc::RecalcFlags) vocabulary of
//! "what changed" bits and the [`UpdateSource`](recalc::UpdateSource) of a tag.
//!
//! **[`datablock`]**: [`Main`](datablock::Main), the database of original
//! data-blocks addressed by generational [`IdRef`](id::IdRef) handles.
//!
//! **[`node`]**: Node model: ID nodes, components, operations and the
//! static component factory table.
//!
//! **[`graph`]**: [`Depsgraph`](graph::Depsgraph) storage, relation
//! bookkeeping via `understory_dirty`, and the process-wide
//! [`GraphRegistry`](graph::GraphRegistry).
//!
//! **[`tag`]**: The tag propagator, the classifier, multi-graph fan-out,
//! visibility re-tagging and recalc clear/restore for undo.
//!
//! **[`editors`]**: The [`EditorNotifier`](editors::EditorNotifier) contract
//! for synchronous editor updates.
//!
//! **[`session`]**: [`Session`](session::Session), a convenience owner of a
//! database, a registry and the hooks, exposing the main-implicit API.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! tag diagnostics, with the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site). Events are additionally gated at runtime on
//!   [`DebugFlags::tag`](config::DebugFlags::tag).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod datablock;
pub mod dirty;
pub mod editors;
pub mod graph;
pub mod id;
pub mod node;
pub mod recalc;
pub mod session;
pub mod tag;
pub mod trace;
