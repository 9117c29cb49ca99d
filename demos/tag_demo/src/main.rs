// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted editing session that exercises tag propagation and diagnostics.
//!
//! Builds a small scene (a mesh object with a shape key and a node-based
//! material), registers a viewport and a render graph, and replays a few
//! typical edits through a [`Session`] with a
//! [`PrettyPrintSink`](depsgraph_debug::pretty::PrettyPrintSink) attached.
//! The same edits are then replayed into a
//! [`RecorderSink`](depsgraph_debug::recorder::RecorderSink) and exported as
//! JSON lines to `tags.jsonl`.

use std::fs::File;
use std::io::BufWriter;

use depsgraph_core::config::{DebugFlags, DepsgraphConfig};
use depsgraph_core::datablock::Main;
use depsgraph_core::editors::{EditorNotifier, EditorUpdateContext};
use depsgraph_core::graph::{Depsgraph, GraphId, GraphRegistry};
use depsgraph_core::id::{IdRef, IdType, ObjectType, ViewLayerId};
use depsgraph_core::node::{NodeType, OperationCode};
use depsgraph_core::recalc::RecalcFlags;
use depsgraph_core::session::Session;
use depsgraph_core::tag::{self, TagHooks};
use depsgraph_core::trace::Tracer;

use depsgraph_debug::pretty::PrettyPrintSink;
use depsgraph_debug::recorder::RecorderSink;

const VIEW_LAYER: ViewLayerId = ViewLayerId(0);

/// Handles of the demo scene.
#[derive(Clone, Copy)]
struct DemoIds {
    scene: IdRef,
    object: IdRef,
    mesh: IdRef,
    key: IdRef,
    material: IdRef,
}

/// Prints editor notifications to stdout.
struct PrintEditors;

impl EditorNotifier for PrintEditors {
    fn id_update(&mut self, ctx: &EditorUpdateContext, id: IdRef) {
        println!("  editors: id {id:?} updated (graph {:?})", ctx.graph);
    }

    fn scene_update(&mut self, ctx: &EditorUpdateContext, updated: bool) {
        println!("  editors: scene {:?} updated={updated}", ctx.scene);
    }
}

fn main() {
    // -- database ----------------------------------------------------------
    let mut main = Main::new();
    main.set_debug_flags(DebugFlags::TAG);
    let ids = build_database(&mut main);

    // -- graphs ------------------------------------------------------------
    let viewport = build_graph(
        &main,
        ids,
        DepsgraphConfig::viewport().with_debug(DebugFlags::TAG),
    );
    let render = build_graph(&main, ids, DepsgraphConfig::render());

    let mut session = Session::with_main(main);
    let viewport = session.registry_mut().register(viewport);
    let render = session.registry_mut().register(render);
    session.set_trace_sink(Some(Box::new(PrettyPrintSink::new(Box::new(
        std::io::stdout(),
    )))));
    session.set_editor_notifier(Some(Box::new(PrintEditors)));

    // -- first display -----------------------------------------------------
    println!("== first display");
    session.tag_on_visible_update(true);
    for graph in [viewport, render] {
        session.graph_tag_ids_for_visible_update(graph);
    }
    evaluate(&mut session, viewport, "viewport");

    // -- edits -------------------------------------------------------------
    println!("== move the object");
    session.id_tag_update(ids.object, RecalcFlags::TRANSFORM | RecalcFlags::EDITORS);
    evaluate(&mut session, viewport, "viewport");

    println!("== edit the mesh through its object");
    session.id_tag_update(ids.object, RecalcFlags::GEOMETRY);
    evaluate(&mut session, viewport, "viewport");

    println!("== tweak the material");
    session.id_tag_update(ids.material, RecalcFlags::SHADING);
    evaluate(&mut session, render, "render");

    println!("== frame change");
    session.time_tag_update();
    evaluate(&mut session, viewport, "viewport");

    // -- undo step ---------------------------------------------------------
    println!("== undo push");
    session.id_tag_update(ids.mesh, RecalcFlags::GEOMETRY);
    session.ids_clear_recalc(viewport, true);
    session.ids_restore_recalc(viewport);
    let pending = session.main().recalc_after_undo_push(ids.mesh);
    println!("  mesh changes since undo push: {pending}");

    // -- recorded replay ---------------------------------------------------
    let recorder = record();
    let path = "tags.jsonl";
    let file = File::create(path).expect("failed to create tags.jsonl");
    let mut writer = BufWriter::new(file);
    depsgraph_debug::json::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write JSON lines");
    println!("Wrote {path}");
}

/// Replays the edits of the session into a recorder, driving the registry
/// directly with explicit hooks.
fn record() -> RecorderSink {
    let mut main = Main::new();
    let replay = build_database(&mut main);
    let graph = build_graph(
        &main,
        replay,
        DepsgraphConfig::viewport().with_debug(DebugFlags::TAG),
    );
    let mut registry = GraphRegistry::new();
    let graph = registry.register(graph);

    let mut recorder = RecorderSink::new();
    {
        let mut hooks = TagHooks::none().with_tracer(Tracer::new(&mut recorder));
        registry.tag_on_visible_update(&main, false);
        if let Some(g) = registry.get_mut(graph) {
            tag::graph_tag_ids_for_visible_update(&mut main, g, &mut hooks);
        }
        registry.tag_update(&mut main, replay.object, RecalcFlags::TRANSFORM, &mut hooks);
        registry.tag_update(&mut main, replay.object, RecalcFlags::GEOMETRY, &mut hooks);
        registry.tag_update(&mut main, replay.material, RecalcFlags::SHADING, &mut hooks);
        if let Some(g) = registry.get_mut(graph) {
            tag::ids_clear_recalc(&mut main, g, true, &mut hooks);
            tag::ids_restore_recalc(g, &mut hooks);
        }
    }
    recorder
}

fn build_database(main: &mut Main) -> DemoIds {
    let scene = main.add(IdType::Scene, "Scene");
    let object = main.add_object(ObjectType::Mesh, "Cube");
    let mesh = main.add(IdType::Mesh, "Cube");
    let key = main.add(IdType::Key, "Key");
    let material = main.add(IdType::Material, "Metal");
    let tree = main.add(IdType::NodeTree, "Shader Nodetree");
    main.set_object_data(object, Some(mesh));
    main.set_shape_key(mesh, Some(key));
    main.set_node_tree(material, Some(tree));
    main.set_animation_data(object, true);
    DemoIds {
        scene,
        object,
        mesh,
        key,
        material,
    }
}

fn build_graph(main: &Main, ids: DemoIds, config: DepsgraphConfig) -> Depsgraph {
    let mut graph = Depsgraph::new(main, ids.scene, VIEW_LAYER, config);
    for id in [ids.scene, ids.object, ids.mesh, ids.key, ids.material] {
        graph.add_id_node(main, id);
        graph.add_operation(id, NodeType::CopyOnWrite, OperationCode::CopyOnWrite);
    }
    graph.add_operation(ids.scene, NodeType::LayerCollections, OperationCode::ViewLayerEval);

    let anim = graph.add_operation(ids.object, NodeType::Animation, OperationCode::AnimationEval);
    let local = graph.add_operation(ids.object, NodeType::Transform, OperationCode::TransformLocal);
    let world = graph.add_operation(ids.object, NodeType::Transform, OperationCode::TransformFinal);
    let object_geometry =
        graph.add_operation(ids.object, NodeType::Geometry, OperationCode::GeometryEval);
    let key_geometry = graph.add_operation(ids.key, NodeType::Geometry, OperationCode::GeometryEval);
    let mesh_geometry =
        graph.add_operation(ids.mesh, NodeType::Geometry, OperationCode::GeometryEval);
    let shading = graph.add_operation(ids.material, NodeType::Shading, OperationCode::Shading);
    let batch = graph.add_operation(ids.object, NodeType::BatchCache, OperationCode::BatchUpdate);
    graph.set_entry_operation(local);
    graph.add_time_dependency(anim);

    let relations = [
        (anim, local),
        (local, world),
        (key_geometry, mesh_geometry),
        (mesh_geometry, object_geometry),
        (object_geometry, batch),
        (shading, batch),
    ];
    for (from, to) in relations {
        graph
            .add_relation(from, to)
            .expect("demo relations are acyclic");
    }
    for id in [ids.scene, ids.object, ids.mesh, ids.key, ids.material] {
        if let Some(node) = graph.find_id_node_mut(id) {
            node.set_all_components_visible();
        }
    }
    graph
}

/// Flushes one graph, lists what would run, then clears the tags like an
/// evaluator would.
fn evaluate(session: &mut Session, graph: GraphId, label: &str) {
    session.editors_update(graph, false);
    let Some(g) = session.graph_mut(graph) else {
        return;
    };
    let keys = g.flush_updates();
    println!("  {label}: {} operation(s) to run", keys.len());
    for key in &keys {
        let op = g.operation(*key);
        println!("    {} / {}", op.component(), op.opcode());
    }
    g.clear_operation_tags();
}
