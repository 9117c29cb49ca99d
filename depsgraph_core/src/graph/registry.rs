// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The registry of live graphs.
//!
//! A data-block may be referenced by any number of graphs at once. The
//! registry is how multi-graph operations discover them: construct one at
//! startup, register graphs as they are created, and unregister them before
//! they are dropped.

use alloc::vec::Vec;
use core::fmt;

use crate::id::MainId;

use super::Depsgraph;

/// A handle to a registered graph.
///
/// Handles are never reused within one registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u32);

impl GraphId {
    /// Returns the raw value (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphId({})", self.0)
    }
}

/// Owner of every registered graph, in registration order.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    pub(crate) graphs: Vec<(GraphId, Depsgraph)>,
    next_id: u32,
}

impl GraphRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `graph` and returns its handle.
    pub fn register(&mut self, mut graph: Depsgraph) -> GraphId {
        let id = GraphId(self.next_id);
        self.next_id += 1;
        graph.registered_as = Some(id);
        self.graphs.push((id, graph));
        id
    }

    /// Removes a graph from the registry and hands it back.
    ///
    /// The relative order of the remaining graphs is preserved.
    pub fn unregister(&mut self, id: GraphId) -> Option<Depsgraph> {
        let pos = self.graphs.iter().position(|(gid, _)| *gid == id)?;
        let (_, mut graph) = self.graphs.remove(pos);
        graph.registered_as = None;
        Some(graph)
    }

    /// Returns the graph behind `id`.
    #[must_use]
    pub fn get(&self, id: GraphId) -> Option<&Depsgraph> {
        self.graphs
            .iter()
            .find(|(gid, _)| *gid == id)
            .map(|(_, graph)| graph)
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, id: GraphId) -> Option<&mut Depsgraph> {
        self.graphs
            .iter_mut()
            .find(|(gid, _)| *gid == id)
            .map(|(_, graph)| graph)
    }

    /// Returns the number of registered graphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Returns whether no graph is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Iterates over every registered graph, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (GraphId, &Depsgraph)> + '_ {
        self.graphs.iter().map(|(id, graph)| (*id, graph))
    }

    /// Iterates over the graphs that may reference data of `main`, in
    /// registration order.
    pub fn graphs_for_main(&self, main: MainId) -> impl Iterator<Item = &Depsgraph> + '_ {
        self.graphs
            .iter()
            .map(|(_, graph)| graph)
            .filter(move |graph| graph.main == main)
    }

    /// Mutable variant of [`graphs_for_main`](Self::graphs_for_main).
    pub fn graphs_for_main_mut(
        &mut self,
        main: MainId,
    ) -> impl Iterator<Item = &mut Depsgraph> + '_ {
        self.graphs
            .iter_mut()
            .map(|(_, graph)| graph)
            .filter(move |graph| graph.main == main)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::config::DepsgraphConfig;
    use crate::datablock::Main;
    use crate::id::{IdType, ViewLayerId};

    use super::*;

    #[test]
    fn register_and_unregister_preserve_order() {
        let mut main = Main::new();
        let scene = main.add(IdType::Scene, "Scene");
        let mut registry = GraphRegistry::new();
        let ids: Vec<_> = (0..3)
            .map(|i| {
                registry.register(Depsgraph::new(
                    &main,
                    scene,
                    ViewLayerId(i),
                    DepsgraphConfig::render(),
                ))
            })
            .collect();

        let graph = registry.unregister(ids[1]).expect("registered");
        assert_eq!(graph.registered_as(), None);
        assert_eq!(graph.view_layer(), ViewLayerId(1));

        let layers: Vec<_> = registry.iter().map(|(_, g)| g.view_layer()).collect();
        assert_eq!(layers, [ViewLayerId(0), ViewLayerId(2)]);
        assert!(registry.unregister(ids[1]).is_none(), "already gone");
        assert_eq!(
            registry.get(ids[2]).and_then(Depsgraph::registered_as),
            Some(ids[2])
        );
    }

    #[test]
    fn graphs_are_filtered_by_main() {
        let mut a = Main::new();
        let mut b = Main::new();
        let scene_a = a.add(IdType::Scene, "A");
        let scene_b = b.add(IdType::Scene, "B");
        let mut registry = GraphRegistry::new();
        registry.register(Depsgraph::new(&a, scene_a, ViewLayerId(0), DepsgraphConfig::viewport()));
        registry.register(Depsgraph::new(&b, scene_b, ViewLayerId(0), DepsgraphConfig::viewport()));
        registry.register(Depsgraph::new(&a, scene_a, ViewLayerId(1), DepsgraphConfig::render()));

        assert_eq!(registry.graphs_for_main(a.id()).count(), 2);
        assert_eq!(registry.graphs_for_main(b.id()).count(), 1);
        assert_eq!(registry.len(), 3);
    }
}
