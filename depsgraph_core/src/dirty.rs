// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Operation nodes are keyed by their [`OperationKey`](crate::node::OperationKey)
//! index in an [`understory_dirty::DirtyTracker`]. Relations between
//! operations are dependency edges on [`ENTRY`]: the target of a relation
//! depends on its source.
//!
//! Tagging an operation marks it on [`ENTRY`] with
//! [`EagerPolicy`](understory_dirty::EagerPolicy), so marking the source of
//! a relation also marks every operation downstream of it.
//! [`Depsgraph::flush_updates`](crate::graph::Depsgraph::flush_updates)
//! drains the channel and hands the affected operations to the evaluator.

use understory_dirty::Channel;

/// Operation was tagged (directly or through a relation) and must be
/// re-evaluated.
pub const ENTRY: Channel = Channel::new(0);
