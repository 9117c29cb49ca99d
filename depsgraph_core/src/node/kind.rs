// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node type and operation code enumerations, and the static per-component
//! factory properties.

use core::fmt;

use crate::recalc::RecalcFlags;

/// The kind of a node in the graph.
///
/// Apart from [`Undefined`](Self::Undefined), [`IdRef`](Self::IdRef) and
/// [`TimeSource`](Self::TimeSource), every variant names a component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Sentinel: the classifier found nothing to tag.
    Undefined,
    /// The ID node itself; tagging it tags every component.
    IdRef,
    /// The graph's time source.
    TimeSource,
    /// Generic parameters.
    Parameters,
    /// Animation data and drivers.
    Animation,
    /// Object transformation.
    Transform,
    /// Evaluated geometry.
    Geometry,
    /// Sequencer strips.
    Sequencer,
    /// View layer collections and bases.
    LayerCollections,
    /// Copy-on-write refresh of the evaluated copy.
    CopyOnWrite,
    /// Object flags derived from its view layer base.
    ObjectFromLayer,
    /// Audio state.
    Audio,
    /// Armature data.
    Armature,
    /// Data-block without dedicated components.
    GenericDatablock,
    /// Object visibility.
    Visibility,
    /// Pose evaluation.
    EvalPose,
    /// A single bone.
    Bone,
    /// Particle systems of an object.
    ParticleSystem,
    /// Particle settings data-block.
    ParticleSettings,
    /// Shading.
    Shading,
    /// Evaluation caches.
    Cache,
    /// Point cache of simulations.
    PointCache,
    /// Image sequence animation.
    ImageAnimation,
    /// Draw batch cache.
    BatchCache,
    /// Dupli-list generation.
    Dupli,
    /// Synchronization back to the original data.
    Synchronization,
    /// Simulation state.
    Simulation,
    /// Node tree output nodes.
    NTreeOutput,
}

impl NodeType {
    /// Returns the label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "UNDEFINED",
            Self::IdRef => "ID_REF",
            Self::TimeSource => "TIMESOURCE",
            Self::Parameters => "PARAMETERS",
            Self::Animation => "ANIMATION",
            Self::Transform => "TRANSFORM",
            Self::Geometry => "GEOMETRY",
            Self::Sequencer => "SEQUENCER",
            Self::LayerCollections => "LAYER_COLLECTIONS",
            Self::CopyOnWrite => "COPY_ON_WRITE",
            Self::ObjectFromLayer => "OBJECT_FROM_LAYER",
            Self::Audio => "AUDIO",
            Self::Armature => "ARMATURE",
            Self::GenericDatablock => "GENERIC_DATABLOCK",
            Self::Visibility => "VISIBILITY",
            Self::EvalPose => "EVAL_POSE",
            Self::Bone => "BONE",
            Self::ParticleSystem => "PARTICLE_SYSTEM",
            Self::ParticleSettings => "PARTICLE_SETTINGS",
            Self::Shading => "SHADING",
            Self::Cache => "CACHE",
            Self::PointCache => "POINT_CACHE",
            Self::ImageAnimation => "IMAGE_ANIMATION",
            Self::BatchCache => "BATCH_CACHE",
            Self::Dupli => "DUPLI",
            Self::Synchronization => "SYNCHRONIZATION",
            Self::Simulation => "SIMULATION",
            Self::NTreeOutput => "NTREE_OUTPUT",
        }
    }

    /// Returns whether this type names a component that can live in an
    /// ID node.
    #[must_use]
    pub const fn is_component(self) -> bool {
        !matches!(self, Self::Undefined | Self::IdRef | Self::TimeSource)
    }

    /// Returns the bit of this component type in an ID node's visibility
    /// masks, or `None` for non-component types.
    #[must_use]
    pub const fn visibility_bit(self) -> Option<u64> {
        if self.is_component() {
            Some(1 << (self as u32))
        } else {
            None
        }
    }

    /// Recalc flags a tag on this component type always implies on the
    /// evaluated copy.
    #[must_use]
    pub const fn id_recalc_tag(self) -> RecalcFlags {
        match self {
            Self::Animation => RecalcFlags::ANIMATION,
            Self::BatchCache | Self::Shading => RecalcFlags::SHADING,
            Self::CopyOnWrite => RecalcFlags::COPY_ON_WRITE,
            Self::Geometry | Self::ParticleSystem | Self::EvalPose | Self::Bone => {
                RecalcFlags::GEOMETRY
            }
            Self::Parameters => RecalcFlags::PARAMETERS,
            Self::Sequencer => RecalcFlags::SEQUENCER_STRIPS,
            Self::Transform => RecalcFlags::TRANSFORM,
            Self::NTreeOutput => RecalcFlags::NTREE_OUTPUT,
            _ => RecalcFlags::NONE,
        }
    }

    /// Whether re-evaluating this component requires the evaluated copy to be
    /// refreshed from the original first.
    #[must_use]
    pub const fn need_tag_cow_before_update(self) -> bool {
        !matches!(
            self,
            Self::BatchCache
                | Self::ParticleSettings
                | Self::ObjectFromLayer
                | Self::Dupli
                | Self::Synchronization
                | Self::Visibility
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminates operations within a component.
///
/// [`Operation`](Self::Operation) is the generic code: as a classifier result
/// it means "tag the whole component".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationCode {
    /// Generic operation.
    Operation,
    /// Parameter evaluation.
    ParametersEval,
    /// Animation evaluation.
    AnimationEval,
    /// Driver evaluation.
    Driver,
    /// Local transform.
    TransformLocal,
    /// Final transform.
    TransformFinal,
    /// Geometry evaluation.
    GeometryEval,
    /// Selection update of edit-mode geometry.
    GeometrySelectUpdate,
    /// Selection update of a movie clip.
    MovieclipSelectUpdate,
    /// View layer evaluation.
    ViewLayerEval,
    /// Entry of an object's from-layer component.
    ObjectFromLayerEntry,
    /// Base flags synchronization.
    ObjectBaseFlags,
    /// Copy-on-write refresh.
    CopyOnWrite,
    /// Particle settings reset.
    ParticleSettingsReset,
    /// Particle settings evaluation.
    ParticleSettingsEval,
    /// Particle system evaluation.
    ParticleSystemEval,
    /// Point cache reset.
    PointCacheReset,
    /// Shading evaluation.
    Shading,
    /// Sequencer strips evaluation.
    SequencesEval,
    /// Sound evaluation.
    SoundEval,
    /// Pose initialization.
    PoseInit,
    /// Pose finalization.
    PoseDone,
    /// Batch cache update.
    BatchUpdate,
    /// Node tree output update.
    NTreeOutput,
}

impl OperationCode {
    /// Returns the label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operation => "OPERATION",
            Self::ParametersEval => "PARAMETERS_EVAL",
            Self::AnimationEval => "ANIMATION_EVAL",
            Self::Driver => "DRIVER",
            Self::TransformLocal => "TRANSFORM_LOCAL",
            Self::TransformFinal => "TRANSFORM_FINAL",
            Self::GeometryEval => "GEOMETRY_EVAL",
            Self::GeometrySelectUpdate => "GEOMETRY_SELECT_UPDATE",
            Self::MovieclipSelectUpdate => "MOVIECLIP_SELECT_UPDATE",
            Self::ViewLayerEval => "VIEW_LAYER_EVAL",
            Self::ObjectFromLayerEntry => "OBJECT_FROM_LAYER_ENTRY",
            Self::ObjectBaseFlags => "OBJECT_BASE_FLAGS",
            Self::CopyOnWrite => "COPY_ON_WRITE",
            Self::ParticleSettingsReset => "PARTICLE_SETTINGS_RESET",
            Self::ParticleSettingsEval => "PARTICLE_SETTINGS_EVAL",
            Self::ParticleSystemEval => "PARTICLE_SYSTEM_EVAL",
            Self::PointCacheReset => "POINT_CACHE_RESET",
            Self::Shading => "SHADING",
            Self::SequencesEval => "SEQUENCES_EVAL",
            Self::SoundEval => "SOUND_EVAL",
            Self::PoseInit => "POSE_INIT",
            Self::PoseDone => "POSE_DONE",
            Self::BatchUpdate => "BATCH_UPDATE",
            Self::NTreeOutput => "NTREE_OUTPUT",
        }
    }
}

impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_bits_fit_mask() {
        assert_eq!(NodeType::IdRef.visibility_bit(), None);
        let bit = NodeType::NTreeOutput.visibility_bit();
        assert!(bit.is_some_and(|b| b != 0), "last component has a bit");
        assert_ne!(
            NodeType::Transform.visibility_bit(),
            NodeType::Geometry.visibility_bit()
        );
    }

    #[test]
    fn factory_recalc_tags() {
        assert_eq!(NodeType::EvalPose.id_recalc_tag(), RecalcFlags::GEOMETRY);
        assert_eq!(NodeType::BatchCache.id_recalc_tag(), RecalcFlags::SHADING);
        assert_eq!(NodeType::PointCache.id_recalc_tag(), RecalcFlags::NONE);
        assert_eq!(NodeType::IdRef.id_recalc_tag(), RecalcFlags::NONE);
    }

    #[test]
    fn cow_requirements() {
        assert!(NodeType::Geometry.need_tag_cow_before_update());
        assert!(NodeType::Transform.need_tag_cow_before_update());
        assert!(!NodeType::BatchCache.need_tag_cow_before_update());
        assert!(!NodeType::ObjectFromLayer.need_tag_cow_before_update());
    }
}
