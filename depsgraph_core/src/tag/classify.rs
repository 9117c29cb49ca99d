// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping of a single recalc bit to the component and operation it tags.
//!
//! Pure functions: nothing here touches a graph. Unsupported combinations of
//! data-block type and flag map to [`NodeType::Undefined`], which the
//! propagator treats as "nothing to tag".

use crate::datablock::DataBlock;
use crate::id::{IdType, ObjectType};
use crate::node::{NodeType, OperationCode};
use crate::recalc::RecalcFlags;

/// Classifies `tag` for `block`.
///
/// `tag` must be a single bit or empty (the legacy request). Composite masks
/// are a caller bug: they trip a debug assertion, and classify as
/// [`NodeType::Undefined`] in release builds.
#[must_use]
pub fn component_and_opcode(block: &DataBlock, tag: RecalcFlags) -> (NodeType, OperationCode) {
    debug_assert!(
        tag.is_empty() || tag.is_single(),
        "composite recalc flags must be split before classification: {tag}"
    );
    let generic = |kind| (kind, OperationCode::Operation);

    if tag.is_empty() {
        return generic(NodeType::IdRef);
    }
    let id_type = block.id_type();
    match tag {
        RecalcFlags::TRANSFORM => generic(NodeType::Transform),
        RecalcFlags::GEOMETRY => generic(geometry_tag_to_component(block)),
        RecalcFlags::ANIMATION => generic(NodeType::Animation),
        RecalcFlags::PSYS_REDO
        | RecalcFlags::PSYS_RESET
        | RecalcFlags::PSYS_CHILD
        | RecalcFlags::PSYS_PHYS => {
            if id_type == IdType::ParticleSettings {
                let opcode = if tag == RecalcFlags::PSYS_RESET {
                    OperationCode::ParticleSettingsReset
                } else {
                    OperationCode::Operation
                };
                (NodeType::ParticleSettings, opcode)
            } else {
                generic(NodeType::ParticleSystem)
            }
        }
        RecalcFlags::COPY_ON_WRITE => generic(NodeType::CopyOnWrite),
        RecalcFlags::SHADING => generic(NodeType::Shading),
        RecalcFlags::SELECT => select_tag_to_component(id_type),
        RecalcFlags::BASE_FLAGS => base_flags_tag_to_component(id_type),
        RecalcFlags::POINT_CACHE => generic(NodeType::PointCache),
        RecalcFlags::SEQUENCER_STRIPS => generic(NodeType::Sequencer),
        RecalcFlags::FRAME_CHANGE
        | RecalcFlags::AUDIO_FPS
        | RecalcFlags::AUDIO_VOLUME
        | RecalcFlags::AUDIO_MUTE
        | RecalcFlags::AUDIO_LISTENER
        | RecalcFlags::AUDIO => generic(NodeType::Audio),
        RecalcFlags::PARAMETERS | RecalcFlags::SOURCE => generic(NodeType::Parameters),
        RecalcFlags::NTREE_OUTPUT => (NodeType::NTreeOutput, OperationCode::NTreeOutput),
        // EDITORS is handled by the propagator, TAG_FOR_UNDO belongs to the
        // undo system, and provision bits are reserved.
        _ => generic(NodeType::Undefined),
    }
}

/// Component that holds the geometry of `block`.
#[must_use]
pub fn geometry_tag_to_component(block: &DataBlock) -> NodeType {
    match block.id_type() {
        IdType::Object => match block.object_type() {
            Some(
                ObjectType::Mesh
                | ObjectType::Curve
                | ObjectType::Surface
                | ObjectType::Font
                | ObjectType::Lattice
                | ObjectType::MetaBall
                | ObjectType::GPencilLegacy
                | ObjectType::Curves
                | ObjectType::PointCloud
                | ObjectType::Volume,
            ) => NodeType::Geometry,
            Some(ObjectType::Armature) => NodeType::EvalPose,
            _ => NodeType::Undefined,
        },
        IdType::Mesh
        | IdType::CurveLegacy
        | IdType::Lattice
        | IdType::MetaBall
        | IdType::Curves
        | IdType::PointCloud
        | IdType::Volume
        | IdType::Collection
        | IdType::GPencilLegacy
        | IdType::GreasePencil => NodeType::Geometry,
        // Particles are tagged through the particle bits.
        IdType::ParticleSettings => NodeType::Undefined,
        IdType::LightProbe | IdType::Palette | IdType::Mask => NodeType::Parameters,
        _ => NodeType::Undefined,
    }
}

fn select_tag_to_component(id_type: IdType) -> (NodeType, OperationCode) {
    match id_type {
        // Selection flushes to every object of the scene. Coarse, but avoids
        // dedicated exit operations per base.
        IdType::Scene => (NodeType::LayerCollections, OperationCode::ViewLayerEval),
        IdType::Object => (
            NodeType::ObjectFromLayer,
            OperationCode::ObjectFromLayerEntry,
        ),
        IdType::MovieClip => (NodeType::BatchCache, OperationCode::MovieclipSelectUpdate),
        ty if ty.supports_edit_mode() => {
            (NodeType::BatchCache, OperationCode::GeometrySelectUpdate)
        }
        _ => (NodeType::CopyOnWrite, OperationCode::CopyOnWrite),
    }
}

fn base_flags_tag_to_component(id_type: IdType) -> (NodeType, OperationCode) {
    match id_type {
        IdType::Scene => (NodeType::LayerCollections, OperationCode::ViewLayerEval),
        IdType::Object => (NodeType::ObjectFromLayer, OperationCode::ObjectBaseFlags),
        _ => (NodeType::Undefined, OperationCode::Operation),
    }
}
