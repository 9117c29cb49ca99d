// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-block identity types.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// A handle to a data-block in a [`Main`](crate::datablock::Main).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a data-block is removed and the slot is reused.
/// Graphs hold these as weak back-references: the lifetime of the referenced
/// data-block is governed solely by its `Main`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdRef {
    /// Slot index into the database arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the database's generation for this slot.
    pub(crate) generation: u32,
}

impl IdRef {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for IdRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdRef({}@gen{})", self.idx, self.generation)
    }
}

/// Process-unique identity of a [`Main`](crate::datablock::Main).
///
/// Graphs remember the `MainId` they were built against; the registry uses it
/// to discover every graph that may reference a given database.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MainId(u32);

impl MainId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for MainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MainId({})", self.0)
    }
}

/// An opaque reference to a view layer of a scene.
///
/// View layers are owned by the host; the graph only forwards this value to
/// editor callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewLayerId(pub u32);

/// The kind of a data-block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdType {
    /// Scene.
    Scene,
    /// Object.
    Object,
    /// Mesh.
    Mesh,
    /// Legacy curve (also surfaces and text).
    CurveLegacy,
    /// Metaball.
    MetaBall,
    /// Material.
    Material,
    /// Texture.
    Texture,
    /// Image.
    Image,
    /// Lattice.
    Lattice,
    /// Light.
    Light,
    /// Camera.
    Camera,
    /// Shape key.
    Key,
    /// World.
    World,
    /// Speaker.
    Speaker,
    /// Collection.
    Collection,
    /// Armature.
    Armature,
    /// Action.
    Action,
    /// Node tree.
    NodeTree,
    /// Particle settings.
    ParticleSettings,
    /// Legacy grease pencil.
    GPencilLegacy,
    /// Movie clip.
    MovieClip,
    /// Mask.
    Mask,
    /// Palette.
    Palette,
    /// Light probe.
    LightProbe,
    /// Sound.
    Sound,
    /// Hair curves.
    Curves,
    /// Point cloud.
    PointCloud,
    /// Volume.
    Volume,
    /// Grease pencil.
    GreasePencil,
    /// Simulation.
    Simulation,
}

impl IdType {
    /// Number of data-block types.
    pub const COUNT: usize = 30;

    /// Every data-block type, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Scene,
        Self::Object,
        Self::Mesh,
        Self::CurveLegacy,
        Self::MetaBall,
        Self::Material,
        Self::Texture,
        Self::Image,
        Self::Lattice,
        Self::Light,
        Self::Camera,
        Self::Key,
        Self::World,
        Self::Speaker,
        Self::Collection,
        Self::Armature,
        Self::Action,
        Self::NodeTree,
        Self::ParticleSettings,
        Self::GPencilLegacy,
        Self::MovieClip,
        Self::Mask,
        Self::Palette,
        Self::LightProbe,
        Self::Sound,
        Self::Curves,
        Self::PointCloud,
        Self::Volume,
        Self::GreasePencil,
        Self::Simulation,
    ];

    /// Returns the dense index of this type, in `0..COUNT`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the two-letter code that prefixes data-block names.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Scene => "SC",
            Self::Object => "OB",
            Self::Mesh => "ME",
            Self::CurveLegacy => "CU",
            Self::MetaBall => "MB",
            Self::Material => "MA",
            Self::Texture => "TE",
            Self::Image => "IM",
            Self::Lattice => "LT",
            Self::Light => "LA",
            Self::Camera => "CA",
            Self::Key => "KE",
            Self::World => "WO",
            Self::Speaker => "SK",
            Self::Collection => "GR",
            Self::Armature => "AR",
            Self::Action => "AC",
            Self::NodeTree => "NT",
            Self::ParticleSettings => "PA",
            Self::GPencilLegacy => "GD",
            Self::MovieClip => "MC",
            Self::Mask => "MS",
            Self::Palette => "PL",
            Self::LightProbe => "LP",
            Self::Sound => "SO",
            Self::Curves => "CV",
            Self::PointCloud => "PT",
            Self::Volume => "VO",
            Self::GreasePencil => "GP",
            Self::Simulation => "SI",
        }
    }

    /// Returns whether data of this type has an edit mode with its own
    /// selection state.
    #[must_use]
    pub const fn supports_edit_mode(self) -> bool {
        matches!(
            self,
            Self::Mesh
                | Self::CurveLegacy
                | Self::MetaBall
                | Self::Lattice
                | Self::GPencilLegacy
                | Self::Curves
                | Self::PointCloud
                | Self::Volume
        )
    }

    /// Returns whether data of this type may own an embedded node tree.
    #[must_use]
    pub const fn can_embed_node_tree(self) -> bool {
        matches!(
            self,
            Self::Material
                | Self::Texture
                | Self::Light
                | Self::World
                | Self::Scene
                | Self::Simulation
        )
    }

    /// Returns whether data of this type may carry a shape key.
    #[must_use]
    pub const fn can_have_shape_key(self) -> bool {
        matches!(self, Self::Mesh | Self::Lattice | Self::CurveLegacy)
    }
}

/// The sub-type of an object data-block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObjectType {
    /// Empty (no data).
    #[default]
    Empty,
    /// Mesh object.
    Mesh,
    /// Legacy curve object.
    Curve,
    /// Surface object.
    Surface,
    /// Text object.
    Font,
    /// Metaball object.
    MetaBall,
    /// Light object.
    Lamp,
    /// Camera object.
    Camera,
    /// Speaker object.
    Speaker,
    /// Light probe object.
    LightProbe,
    /// Lattice object.
    Lattice,
    /// Armature object.
    Armature,
    /// Legacy grease pencil object.
    GPencilLegacy,
    /// Hair curves object.
    Curves,
    /// Point cloud object.
    PointCloud,
    /// Volume object.
    Volume,
}
