// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tag propagator.
//!
//! [`graph_id_tag_update`] turns one `(id, flags)` request into node tags in
//! one graph (or in no graph, for the bookkeeping-only pass). Flags are
//! processed one bit at a time in ascending bit order. Every effect is an OR
//! into an accumulator or an idempotent node tag, so the order only shows in
//! trace output.

use crate::datablock::Main;
use crate::editors::EditorUpdateContext;
use crate::graph::Depsgraph;
use crate::id::{IdRef, IdType};
use crate::node::{NodeType, OperationCode};
use crate::recalc::{RecalcFlags, UpdateSource, recalc_flags_for_legacy_zero};
use crate::trace::{TagDroppedEvent, TagUpdateEvent};

use super::classify::component_and_opcode;
use super::hooks::TagHooks;
use super::per_graph::graph_id_type_tag;

/// Flags actually recorded on the original data-block for a request.
///
/// An inactive graph records nothing. A zero request stands for
/// [`recalc_flags_for_legacy_zero`].
#[must_use]
pub fn recalc_flags_effective(graph: Option<&Depsgraph>, flags: RecalcFlags) -> RecalcFlags {
    if let Some(graph) = graph
        && !graph.is_active()
    {
        return RecalcFlags::NONE;
    }
    if flags.is_empty() {
        return recalc_flags_for_legacy_zero();
    }
    flags
}

/// Tags `id` with `flags` in `graph`.
///
/// With `graph == None` only the original data-block is touched (the
/// `USER_EDIT` write to its recalc flags); this is the graph-less pass of
/// the registry fan-out.
///
/// Stale handles are ignored. Requests against an evaluating graph are
/// dropped (and traced, when the graph's debug flags ask for it).
///
/// `flags` may be any mask: it is split into single bits here. An empty mask
/// is the legacy "tag everything but animation" request.
pub fn graph_id_tag_update(
    main: &mut Main,
    mut graph: Option<&mut Depsgraph>,
    id: IdRef,
    flags: RecalcFlags,
    source: UpdateSource,
    hooks: &mut TagHooks<'_>,
) {
    let Some(block) = main.get(id) else {
        return;
    };
    let id_type = block.id_type();
    let debug = graph
        .as_deref()
        .map_or(main.debug_flags(), Depsgraph::debug_flags);
    let graph_id = graph.as_deref().and_then(Depsgraph::registered_as);

    if graph.as_deref().is_some_and(Depsgraph::is_evaluating) {
        if debug.tag {
            hooks.tracer.tag_dropped(&TagDroppedEvent {
                graph: graph_id,
                id,
                name: block.name(),
                flags,
                source,
            });
        }
        return;
    }
    if debug.tag {
        hooks.tracer.tag_update(&TagUpdateEvent {
            graph: graph_id,
            id,
            name: block.name(),
            flags,
            source,
        });
    }

    let node = graph.as_deref().and_then(|g| g.id_node_index(id));
    if let Some(g) = graph.as_deref_mut() {
        graph_id_type_tag(g, id_type);
    }

    if flags.is_empty() {
        tag_zero(main, graph.as_deref_mut(), id, node, source, hooks);
    }
    if let (Some(g), Some(n)) = (graph.as_deref_mut(), node) {
        g.id_nodes[n as usize].cow.recalc |= flags;
    }
    if source == UpdateSource::UserEdit {
        let effective = recalc_flags_effective(graph.as_deref(), flags);
        main.or_recalc(id, effective);
    }
    for tag in flags {
        tag_single_flag(main, graph.as_deref_mut(), id, node, tag, source, hooks);
    }

    // Embedded trees are never tagged by users directly.
    if let Some(tree) = main.ntree_from_id(id) {
        graph_id_tag_update(main, graph.as_deref_mut(), tree, flags, source, hooks);
    }

    // Shading-only edits keep simulation caches.
    if source == UpdateSource::UserEdit && flags != RecalcFlags::SHADING {
        tag_single_flag(main, graph, id, node, RecalcFlags::POINT_CACHE, source, hooks);
    }
}

/// Legacy request: every component except animation.
fn tag_zero(
    main: &mut Main,
    graph: Option<&mut Depsgraph>,
    id: IdRef,
    node: Option<u32>,
    source: UpdateSource,
    hooks: &mut TagHooks<'_>,
) {
    let (Some(graph), Some(node)) = (graph, node) else {
        return;
    };
    let n = node as usize;
    graph.id_nodes[n].cow.recalc |= recalc_flags_for_legacy_zero();
    for comp in 0..graph.id_nodes[n].components.len() {
        // Re-running animation would discard unkeyed edits.
        match graph.id_nodes[n].components[comp].kind() {
            NodeType::Animation => continue,
            NodeType::CopyOnWrite => graph.id_nodes[n].is_cow_explicitly_tagged = true,
            _ => {}
        }
        graph.tag_component_at(node, comp, source);
    }
    tag_legacy_compat(main, Some(graph), id, RecalcFlags::NONE, source, hooks);
}

fn tag_single_flag(
    main: &mut Main,
    graph: Option<&mut Depsgraph>,
    id: IdRef,
    node: Option<u32>,
    tag: RecalcFlags,
    source: UpdateSource,
    hooks: &mut TagHooks<'_>,
) {
    if tag == RecalcFlags::EDITORS {
        if let Some(graph) = graph
            && graph.is_active()
        {
            notify_editors_id_update(main, graph, id, hooks);
        }
        return;
    }
    let Some(block) = main.get(id) else {
        return;
    };
    let (kind, opcode) = component_and_opcode(block, tag);
    if kind == NodeType::Undefined {
        return;
    }
    // Not built yet; the next relations update picks it up.
    let (Some(graph), Some(node)) = (graph, node) else {
        return;
    };
    graph.id_nodes[node as usize].cow.recalc |= kind.id_recalc_tag();
    if kind == NodeType::IdRef {
        graph.tag_id_node_at(node, source);
    } else {
        tag_component(graph, node, kind, opcode, source);
    }
    tag_legacy_compat(main, Some(graph), id, tag, source, hooks);
}

fn tag_component(
    graph: &mut Depsgraph,
    node: u32,
    kind: NodeType,
    opcode: OperationCode,
    source: UpdateSource,
) {
    let n = node as usize;
    let Some(comp) = graph.id_nodes[n].component_index(kind) else {
        // New drivers or keys can show up before the animation component
        // exists; refresh the copy so the next build sees them.
        if kind == NodeType::Animation {
            graph.id_nodes[n].is_cow_explicitly_tagged = true;
            tag_cow(graph, node, source);
        }
        return;
    };
    if opcode == OperationCode::Operation {
        graph.tag_component_at(node, comp, source);
    } else if let Some(key) = graph.id_nodes[n].components[comp].find_operation(opcode) {
        graph.tag_operation(key, source);
    }
    if kind.need_tag_cow_before_update() {
        tag_cow(graph, node, source);
    }
    if kind == NodeType::CopyOnWrite {
        graph.id_nodes[n].is_cow_explicitly_tagged = true;
    }
}

fn tag_cow(graph: &mut Depsgraph, node: u32, source: UpdateSource) {
    if let Some(comp) = graph.id_nodes[node as usize].component_index(NodeType::CopyOnWrite) {
        graph.tag_component_at(node, comp, source);
    }
}

/// Callers historically tag the object when they mean its data, and the
/// data when they mean its shape key.
fn tag_legacy_compat(
    main: &mut Main,
    graph: Option<&mut Depsgraph>,
    id: IdRef,
    tag: RecalcFlags,
    source: UpdateSource,
    hooks: &mut TagHooks<'_>,
) {
    if !(tag.is_empty() || tag == RecalcFlags::GEOMETRY) {
        return;
    }
    let Some(block) = main.get(id) else {
        return;
    };
    let target = match block.id_type() {
        IdType::Object => block.data(),
        IdType::Mesh | IdType::Lattice | IdType::CurveLegacy => block.shape_key(),
        _ => None,
    };
    if let Some(target) = target {
        graph_id_tag_update(main, graph, target, RecalcFlags::NONE, source, hooks);
    }
}

fn notify_editors_id_update(main: &Main, graph: &Depsgraph, id: IdRef, hooks: &mut TagHooks<'_>) {
    if let Some(editors) = &mut hooks.editors {
        let ctx = EditorUpdateContext {
            main: main.id(),
            graph: graph.registered_as(),
            scene: graph.scene(),
            view_layer: graph.view_layer(),
        };
        editors.id_update(&ctx, id);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::config::DepsgraphConfig;
    use crate::editors::EditorNotifier;
    use crate::id::{ObjectType, ViewLayerId};
    use crate::node::{IdNode, OperationKey};

    use super::*;

    struct Fixture {
        main: Main,
        graph: Depsgraph,
        scene: IdRef,
    }

    impl Fixture {
        fn new(config: DepsgraphConfig) -> Self {
            let mut main = Main::new();
            let scene = main.add(IdType::Scene, "Scene");
            let mut graph = Depsgraph::new(&main, scene, ViewLayerId(7), config);
            graph.add_id_node(&main, scene);
            Self { main, graph, scene }
        }

        fn tag(&mut self, id: IdRef, flags: RecalcFlags, source: UpdateSource) {
            graph_id_tag_update(
                &mut self.main,
                Some(&mut self.graph),
                id,
                flags,
                source,
                &mut TagHooks::none(),
            );
        }

        fn op(&mut self, id: IdRef, kind: NodeType, opcode: OperationCode) -> OperationKey {
            self.graph.add_operation(id, kind, opcode)
        }

        fn needs(&self, key: OperationKey) -> bool {
            self.graph.operation(key).needs_update()
        }
    }

    fn mesh_object(fx: &mut Fixture) -> IdRef {
        let object = fx.main.add_object(ObjectType::Mesh, "Cube");
        fx.graph.add_id_node(&fx.main, object);
        object
    }

    #[test]
    fn zero_tag_accumulates() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        fx.op(object, NodeType::Transform, OperationCode::TransformLocal);
        if let Some(node) = fx.graph.find_id_node_mut(object) {
            node.cow.recalc = RecalcFlags::PROVISION_24;
        }

        fx.tag(object, RecalcFlags::NONE, UpdateSource::Relations);
        let once = fx.graph.find_id_node(object).map(IdNode::cow_recalc);
        fx.tag(object, RecalcFlags::NONE, UpdateSource::Relations);
        let twice = fx.graph.find_id_node(object).map(IdNode::cow_recalc);

        assert_eq!(once, twice, "second zero tag adds nothing");
        let recalc = once.unwrap_or_default();
        assert!(recalc.contains(recalc_flags_for_legacy_zero()));
        assert!(recalc.contains(RecalcFlags::PROVISION_24), "existing bits are kept");
    }

    #[test]
    fn zero_tag_skips_animation() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        let anim = fx.op(object, NodeType::Animation, OperationCode::AnimationEval);
        let xform = fx.op(object, NodeType::Transform, OperationCode::TransformLocal);
        let geom = fx.op(object, NodeType::Geometry, OperationCode::GeometryEval);
        let cow = fx.op(object, NodeType::CopyOnWrite, OperationCode::CopyOnWrite);

        fx.tag(object, RecalcFlags::NONE, UpdateSource::UserEdit);

        assert!(!fx.needs(anim), "animation must survive a zero tag");
        assert!(fx.needs(xform) && fx.needs(geom) && fx.needs(cow));
        assert!(
            fx.graph
                .find_id_node(object)
                .is_some_and(IdNode::is_cow_explicitly_tagged)
        );
    }

    #[test]
    fn geometry_on_object_cascades_to_data_and_key() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        let mesh = fx.main.add(IdType::Mesh, "Cube");
        let key = fx.main.add(IdType::Key, "Key");
        fx.main.set_object_data(object, Some(mesh));
        fx.main.set_shape_key(mesh, Some(key));
        fx.graph.add_id_node(&fx.main, mesh);
        fx.graph.add_id_node(&fx.main, key);
        fx.op(object, NodeType::Geometry, OperationCode::GeometryEval);
        let mesh_geom = fx.op(mesh, NodeType::Geometry, OperationCode::GeometryEval);
        let mesh_anim = fx.op(mesh, NodeType::Animation, OperationCode::AnimationEval);
        let key_geom = fx.op(key, NodeType::Geometry, OperationCode::GeometryEval);

        fx.tag(object, RecalcFlags::GEOMETRY, UpdateSource::Relations);

        assert!(fx.needs(mesh_geom), "object geometry reaches its mesh");
        assert!(!fx.needs(mesh_anim), "cascade is a zero tag");
        assert!(fx.needs(key_geom), "mesh cascade reaches the shape key");
        let mesh_recalc = fx.graph.find_id_node(mesh).map(IdNode::cow_recalc);
        assert_eq!(mesh_recalc, Some(recalc_flags_for_legacy_zero()));
    }

    #[test]
    fn transform_does_not_cascade() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        let mesh = fx.main.add(IdType::Mesh, "Cube");
        fx.main.set_object_data(object, Some(mesh));
        fx.graph.add_id_node(&fx.main, mesh);
        fx.op(object, NodeType::Transform, OperationCode::TransformLocal);
        let mesh_geom = fx.op(mesh, NodeType::Geometry, OperationCode::GeometryEval);

        fx.tag(object, RecalcFlags::TRANSFORM, UpdateSource::Relations);
        assert!(!fx.needs(mesh_geom));
    }

    #[test]
    fn user_edit_point_cache_unless_shading_only() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        let xform = fx.op(object, NodeType::Transform, OperationCode::TransformLocal);
        let shading = fx.op(object, NodeType::Shading, OperationCode::Shading);
        let cache = fx.op(object, NodeType::PointCache, OperationCode::PointCacheReset);

        fx.tag(object, RecalcFlags::SHADING, UpdateSource::UserEdit);
        assert!(fx.needs(shading));
        assert!(!fx.needs(cache), "shading-only edits keep caches");

        fx.tag(object, RecalcFlags::TRANSFORM, UpdateSource::UserEdit);
        assert!(fx.needs(xform));
        assert!(fx.needs(cache), "other user edits reset caches");
    }

    #[test]
    fn point_cache_only_for_user_edits() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        fx.op(object, NodeType::Transform, OperationCode::TransformLocal);
        let cache = fx.op(object, NodeType::PointCache, OperationCode::PointCacheReset);
        fx.tag(object, RecalcFlags::TRANSFORM, UpdateSource::Time);
        assert!(!fx.needs(cache));
    }

    #[test]
    fn evaluating_graph_drops_tags() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        let xform = fx.op(object, NodeType::Transform, OperationCode::TransformLocal);
        fx.graph.set_evaluating(true);
        let before = fx.graph.find_id_node(object).cloned();

        fx.tag(object, RecalcFlags::TRANSFORM, UpdateSource::UserEdit);
        fx.tag(object, RecalcFlags::NONE, UpdateSource::Time);

        assert!(!fx.needs(xform));
        let after = fx.graph.find_id_node(object);
        assert_eq!(after.map(IdNode::cow_recalc), before.as_ref().map(IdNode::cow_recalc));
        assert_eq!(
            after.map(IdNode::is_cow_explicitly_tagged),
            before.as_ref().map(IdNode::is_cow_explicitly_tagged)
        );
        assert!(!fx.graph.id_type_any_updated(), "type tags are dropped too");
        assert_eq!(fx.main.recalc(object), RecalcFlags::NONE);
    }

    #[test]
    fn scene_select_tags_view_layer_eval_only() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let scene = fx.scene;
        let object = mesh_object(&mut fx);
        let view_layer = fx.op(scene, NodeType::LayerCollections, OperationCode::ViewLayerEval);
        let entry = fx.op(object, NodeType::ObjectFromLayer, OperationCode::ObjectFromLayerEntry);
        let base = fx.op(object, NodeType::ObjectFromLayer, OperationCode::ObjectBaseFlags);

        fx.tag(scene, RecalcFlags::SELECT, UpdateSource::Relations);

        assert!(fx.needs(view_layer));
        assert!(!fx.needs(entry) && !fx.needs(base), "per-object operations stay clean");
    }

    #[test]
    fn armature_geometry_tags_pose() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let rig = fx.main.add_object(ObjectType::Armature, "Rig");
        fx.graph.add_id_node(&fx.main, rig);
        let pose = fx.op(rig, NodeType::EvalPose, OperationCode::PoseInit);
        let geom = fx.op(rig, NodeType::Geometry, OperationCode::GeometryEval);

        fx.tag(rig, RecalcFlags::GEOMETRY, UpdateSource::Relations);

        assert!(fx.needs(pose));
        assert!(!fx.needs(geom));
    }

    #[test]
    fn particle_reset_tags_specific_operation() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let settings = fx.main.add(IdType::ParticleSettings, "Hair");
        fx.graph.add_id_node(&fx.main, settings);
        let reset = fx.op(settings, NodeType::ParticleSettings, OperationCode::ParticleSettingsReset);
        let eval = fx.op(settings, NodeType::ParticleSettings, OperationCode::ParticleSettingsEval);

        fx.tag(settings, RecalcFlags::PSYS_RESET, UpdateSource::Relations);

        assert!(fx.needs(reset));
        assert!(!fx.needs(eval), "specific opcode tags only that operation");
    }

    #[test]
    fn material_parameters_reach_embedded_tree() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let material = fx.main.add(IdType::Material, "Metal");
        let tree = fx.main.add(IdType::NodeTree, "Shader");
        fx.main.set_node_tree(material, Some(tree));
        fx.graph.add_id_node(&fx.main, material);
        fx.graph.add_id_node(&fx.main, tree);
        let mat_params = fx.op(material, NodeType::Parameters, OperationCode::ParametersEval);
        let tree_params = fx.op(tree, NodeType::Parameters, OperationCode::ParametersEval);

        fx.tag(material, RecalcFlags::PARAMETERS, UpdateSource::Relations);

        assert!(fx.needs(mat_params));
        assert!(fx.needs(tree_params));
        assert!(fx.graph.id_type_updated(IdType::NodeTree));
    }

    #[test]
    fn missing_animation_component_tags_cow() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        let cow = fx.op(object, NodeType::CopyOnWrite, OperationCode::CopyOnWrite);

        fx.tag(object, RecalcFlags::ANIMATION, UpdateSource::Relations);

        assert!(fx.needs(cow));
        assert!(
            fx.graph
                .find_id_node(object)
                .is_some_and(IdNode::is_cow_explicitly_tagged)
        );
    }

    #[test]
    fn components_needing_cow_cascade() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        fx.op(object, NodeType::Transform, OperationCode::TransformLocal);
        let cow = fx.op(object, NodeType::CopyOnWrite, OperationCode::CopyOnWrite);

        fx.tag(object, RecalcFlags::TRANSFORM, UpdateSource::Relations);

        assert!(fx.needs(cow));
        assert!(
            !fx.graph
                .find_id_node(object)
                .is_some_and(IdNode::is_cow_explicitly_tagged),
            "implicit copy-on-write refresh is not explicit"
        );
    }

    #[test]
    fn user_edit_writes_effective_flags_to_original() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        fx.tag(object, RecalcFlags::TRANSFORM, UpdateSource::UserEdit);
        assert_eq!(fx.main.recalc(object), RecalcFlags::TRANSFORM);
        fx.tag(object, RecalcFlags::NONE, UpdateSource::UserEdit);
        assert!(fx.main.recalc(object).contains(recalc_flags_for_legacy_zero()));

        let mut render = Fixture::new(DepsgraphConfig::render());
        let object = mesh_object(&mut render);
        render.tag(object, RecalcFlags::TRANSFORM, UpdateSource::UserEdit);
        assert_eq!(
            render.main.recalc(object),
            RecalcFlags::NONE,
            "inactive graphs do not write back"
        );
    }

    #[test]
    fn composite_flags_are_split() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        let geom = fx.op(object, NodeType::Geometry, OperationCode::GeometryEval);
        let cow = fx.op(object, NodeType::CopyOnWrite, OperationCode::CopyOnWrite);

        fx.tag(object, RecalcFlags::GEOMETRY_ALL_MODES, UpdateSource::Relations);

        assert!(fx.needs(geom) && fx.needs(cow));
        let recalc = fx.graph.find_id_node(object).map(IdNode::cow_recalc);
        assert!(recalc.is_some_and(|r| r.contains(RecalcFlags::GEOMETRY_ALL_MODES)));
    }

    #[test]
    fn stale_id_is_ignored() {
        let mut fx = Fixture::new(DepsgraphConfig::viewport());
        let object = mesh_object(&mut fx);
        let xform = fx.op(object, NodeType::Transform, OperationCode::TransformLocal);
        fx.main.remove(object);
        fx.tag(object, RecalcFlags::TRANSFORM, UpdateSource::UserEdit);
        assert!(!fx.needs(xform));
        assert!(!fx.graph.id_type_any_updated());
    }

    #[test]
    fn effective_flags() {
        let fx = Fixture::new(DepsgraphConfig::viewport());
        let render = Fixture::new(DepsgraphConfig::render());
        assert_eq!(
            recalc_flags_effective(None, RecalcFlags::NONE),
            recalc_flags_for_legacy_zero()
        );
        assert_eq!(
            recalc_flags_effective(Some(&fx.graph), RecalcFlags::SHADING),
            RecalcFlags::SHADING
        );
        assert_eq!(
            recalc_flags_effective(Some(&render.graph), RecalcFlags::SHADING),
            RecalcFlags::NONE
        );
    }

    #[derive(Default)]
    struct Notifications {
        calls: Vec<(EditorUpdateContext, IdRef)>,
    }

    impl EditorNotifier for Notifications {
        fn id_update(&mut self, ctx: &EditorUpdateContext, id: IdRef) {
            self.calls.push((*ctx, id));
        }
    }

    #[test]
    fn editors_notified_only_on_active_graph() {
        let mut fx = Fixture::new(DepsgraphConfig::render());
        let object = mesh_object(&mut fx);
        let mut editors = Notifications::default();

        let mut hooks = TagHooks::none().with_editors(&mut editors);
        graph_id_tag_update(
            &mut fx.main,
            Some(&mut fx.graph),
            object,
            RecalcFlags::EDITORS,
            UpdateSource::UserEdit,
            &mut hooks,
        );
        drop(hooks);
        assert!(editors.calls.is_empty(), "inactive graph stays silent");

        fx.graph.make_active();
        let mut hooks = TagHooks::none().with_editors(&mut editors);
        graph_id_tag_update(
            &mut fx.main,
            Some(&mut fx.graph),
            object,
            RecalcFlags::EDITORS,
            UpdateSource::UserEdit,
            &mut hooks,
        );
        drop(hooks);
        assert_eq!(editors.calls.len(), 1);
        let (ctx, id) = editors.calls[0];
        assert_eq!(id, object);
        assert_eq!(ctx.scene, fx.scene);
        assert_eq!(ctx.view_layer, ViewLayerId(7));
        assert_eq!(ctx.main, fx.main.id());
    }
}
