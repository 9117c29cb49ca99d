// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recalc flag vocabulary.
//!
//! A [`RecalcFlags`] value is a bitmask of "what changed" tags attached to a
//! data-block or passed to the tag propagator. Most constants are single
//! bits; a few are unions kept for convenience at the public boundary:
//!
//! - [`GEOMETRY_ALL_MODES`](RecalcFlags::GEOMETRY_ALL_MODES): geometry plus
//!   a copy-on-write refresh, so object and edit mode data both update.
//! - [`PSYS_ALL`](RecalcFlags::PSYS_ALL): every particle-system bit.
//! - [`ALL`](RecalcFlags::ALL): every catalog bit. The `PROVISION_*` bits are
//!   outside of it and survive [`ids_clear_recalc`](crate::tag::ids_clear_recalc).
//!
//! The empty mask is the legacy "unspecified" request. The propagator treats
//! it as a broad invalidation and records
//! [`recalc_flags_for_legacy_zero`] on the data-block.
//!
//! Unions are split into single bits (ascending) before classification.
//! [`TAG_FOR_UNDO`](RecalcFlags::TAG_FOR_UNDO) never selects a component.

use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// A set of recalc tags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RecalcFlags(u32);

impl RecalcFlags {
    /// The empty set; as a tag request this is the legacy zero sentinel.
    pub const NONE: Self = Self(0);

    /// Object transformation changed.
    pub const TRANSFORM: Self = Self(1 << 0);
    /// Geometry changed.
    pub const GEOMETRY: Self = Self(1 << 1);
    /// Animation or time changed and animation is to be re-evaluated.
    pub const ANIMATION: Self = Self(1 << 2);
    /// Particle system changed, recompute particles.
    pub const PSYS_REDO: Self = Self(1 << 3);
    /// Particle system changed, reset cached state.
    pub const PSYS_RESET: Self = Self(1 << 4);
    /// Particle children changed.
    pub const PSYS_CHILD: Self = Self(1 << 5);
    /// Particle physics type changed.
    pub const PSYS_PHYS: Self = Self(1 << 6);
    /// Material or shading inputs changed.
    pub const SHADING: Self = Self(1 << 7);
    /// Selection state changed.
    pub const SELECT: Self = Self(1 << 8);
    /// Base flags (visibility, selectability) changed.
    pub const BASE_FLAGS: Self = Self(1 << 9);
    /// Point cache needs to be invalidated.
    pub const POINT_CACHE: Self = Self(1 << 10);
    /// Editors need a synchronous refresh; handled outside the node model.
    pub const EDITORS: Self = Self(1 << 11);
    /// Evaluated copy needs to be refreshed from the original.
    pub const COPY_ON_WRITE: Self = Self(1 << 12);
    /// Sequencer strips changed.
    pub const SEQUENCER_STRIPS: Self = Self(1 << 13);
    /// Current frame changed.
    pub const FRAME_CHANGE: Self = Self(1 << 14);
    /// Audio frame rate changed.
    pub const AUDIO_FPS: Self = Self(1 << 15);
    /// Audio volume changed.
    pub const AUDIO_VOLUME: Self = Self(1 << 16);
    /// Audio mute state changed.
    pub const AUDIO_MUTE: Self = Self(1 << 17);
    /// Audio listener changed.
    pub const AUDIO_LISTENER: Self = Self(1 << 18);
    /// Generic audio change covering every audio aspect.
    pub const AUDIO: Self = Self(1 << 19);
    /// Generic parameters changed.
    pub const PARAMETERS: Self = Self(1 << 20);
    /// Source data (file path, text) changed.
    pub const SOURCE: Self = Self(1 << 21);
    /// Marker for the undo system; inert for graph propagation.
    pub const TAG_FOR_UNDO: Self = Self(1 << 22);
    /// A node tree changed in a way that affects its output nodes.
    pub const NTREE_OUTPUT: Self = Self(1 << 23);

    /// Reserved bit, ignored by the propagator.
    pub const PROVISION_24: Self = Self(1 << 24);
    /// Reserved bit, ignored by the propagator.
    pub const PROVISION_25: Self = Self(1 << 25);
    /// Reserved bit, ignored by the propagator.
    pub const PROVISION_26: Self = Self(1 << 26);
    /// Reserved bit, ignored by the propagator.
    pub const PROVISION_27: Self = Self(1 << 27);
    /// Reserved bit, ignored by the propagator.
    pub const PROVISION_28: Self = Self(1 << 28);
    /// Reserved bit, ignored by the propagator.
    pub const PROVISION_29: Self = Self(1 << 29);
    /// Reserved bit, ignored by the propagator.
    pub const PROVISION_30: Self = Self(1 << 30);
    /// Reserved bit, ignored by the propagator.
    pub const PROVISION_31: Self = Self(1 << 31);

    /// Geometry of both object and edit modes.
    pub const GEOMETRY_ALL_MODES: Self = Self(Self::GEOMETRY.0 | Self::COPY_ON_WRITE.0);
    /// Every particle-system bit.
    pub const PSYS_ALL: Self = Self(
        Self::PSYS_REDO.0 | Self::PSYS_RESET.0 | Self::PSYS_CHILD.0 | Self::PSYS_PHYS.0,
    );
    /// Every catalog bit. Provision bits are excluded.
    pub const ALL: Self = Self((1 << 24) - 1);
    /// Every provision bit.
    pub const PROVISIONS: Self = Self(!Self::ALL.0);

    /// Creates a set from raw bits, keeping unknown bits.
    #[inline]
    #[must_use]
    pub const fn from_bits_retain(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns whether no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns whether every bit of `other` is set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns whether `self` and `other` share any bit.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns whether exactly one bit is set.
    #[inline]
    #[must_use]
    pub const fn is_single(self) -> bool {
        self.0.is_power_of_two()
    }

    /// Returns the union of `self` and `other`.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `self` without the bits of `other`.
    #[inline]
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Sets the bits of `other`.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the bits of `other`.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Iterates over the set bits as single-bit sets, lowest first.
    #[inline]
    #[must_use]
    pub const fn iter(self) -> Iter {
        Iter { remaining: self.0 }
    }

    /// Returns the label of a single bit, or `None` for unions and the empty set.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::TRANSFORM => "TRANSFORM",
            Self::GEOMETRY => "GEOMETRY",
            Self::ANIMATION => "ANIMATION",
            Self::PSYS_REDO => "PSYS_REDO",
            Self::PSYS_RESET => "PSYS_RESET",
            Self::PSYS_CHILD => "PSYS_CHILD",
            Self::PSYS_PHYS => "PSYS_PHYS",
            Self::SHADING => "SHADING",
            Self::SELECT => "SELECT",
            Self::BASE_FLAGS => "BASE_FLAGS",
            Self::POINT_CACHE => "POINT_CACHE",
            Self::EDITORS => "EDITORS",
            Self::COPY_ON_WRITE => "COPY_ON_WRITE",
            Self::SEQUENCER_STRIPS => "SEQUENCER_STRIPS",
            Self::FRAME_CHANGE => "FRAME_CHANGE",
            Self::AUDIO_FPS => "AUDIO_FPS",
            Self::AUDIO_VOLUME => "AUDIO_VOLUME",
            Self::AUDIO_MUTE => "AUDIO_MUTE",
            Self::AUDIO_LISTENER => "AUDIO_LISTENER",
            Self::AUDIO => "AUDIO",
            Self::PARAMETERS => "PARAMETERS",
            Self::SOURCE => "SOURCE",
            Self::TAG_FOR_UNDO => "TAG_FOR_UNDO",
            Self::NTREE_OUTPUT => "NTREE_OUTPUT",
            Self::PROVISION_24 => "PROVISION_24",
            Self::PROVISION_25 => "PROVISION_25",
            Self::PROVISION_26 => "PROVISION_26",
            Self::PROVISION_27 => "PROVISION_27",
            Self::PROVISION_28 => "PROVISION_28",
            Self::PROVISION_29 => "PROVISION_29",
            Self::PROVISION_30 => "PROVISION_30",
            Self::PROVISION_31 => "PROVISION_31",
            _ => return None,
        };
        Some(name)
    }
}

/// Flags recorded on a data-block for a legacy zero request.
///
/// Everything except particle systems, animation, frame change, source and
/// editors.
#[inline]
#[must_use]
pub const fn recalc_flags_for_legacy_zero() -> RecalcFlags {
    RecalcFlags::ALL.difference(
        RecalcFlags::PSYS_ALL
            .union(RecalcFlags::ANIMATION)
            .union(RecalcFlags::FRAME_CHANGE)
            .union(RecalcFlags::SOURCE)
            .union(RecalcFlags::EDITORS),
    )
}

/// Iterator over the single bits of a [`RecalcFlags`], lowest first.
///
/// Created by [`RecalcFlags::iter`].
#[derive(Clone, Debug)]
pub struct Iter {
    remaining: u32,
}

impl Iterator for Iter {
    type Item = RecalcFlags;

    fn next(&mut self) -> Option<RecalcFlags> {
        if self.remaining == 0 {
            return None;
        }
        let bit = self.remaining & self.remaining.wrapping_neg();
        self.remaining &= !bit;
        Some(RecalcFlags(bit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Iter {}

impl IntoIterator for RecalcFlags {
    type Item = Self;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

impl BitOr for RecalcFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for RecalcFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for RecalcFlags {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for RecalcFlags {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for RecalcFlags {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(!self.0)
    }
}

/// Human-readable form for logs: `LEGACY_0` for the empty set, otherwise the
/// bit labels joined by `", "`.
impl fmt::Display for RecalcFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("LEGACY_0");
        }
        for (i, bit) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            // Every single bit has a label.
            f.write_str(bit.name().unwrap_or("?"))?;
        }
        Ok(())
    }
}

impl fmt::Debug for RecalcFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecalcFlags({self})")
    }
}

/// Where a tag request came from.
///
/// The source decides which side channels fire: only user edits are written
/// back to the original data-block and invalidate point caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateSource {
    /// Frame change.
    Time,
    /// Interactive or scripted edit.
    UserEdit,
    /// Relations were rebuilt.
    Relations,
    /// Visibility of data-blocks changed.
    Visibility,
}

impl UpdateSource {
    /// Returns the label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "TIME",
            Self::UserEdit => "USER_EDIT",
            Self::Relations => "RELATIONS",
            Self::Visibility => "VISIBILITY",
        }
    }
}

impl fmt::Display for UpdateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn iter_yields_single_bits_ascending() {
        let flags = RecalcFlags::SHADING | RecalcFlags::TRANSFORM | RecalcFlags::NTREE_OUTPUT;
        let bits: Vec<_> = flags.iter().collect();
        assert_eq!(
            bits,
            [
                RecalcFlags::TRANSFORM,
                RecalcFlags::SHADING,
                RecalcFlags::NTREE_OUTPUT
            ]
        );
        assert!(bits.iter().all(|b| b.is_single()), "iter yields single bits");
    }

    #[test]
    fn every_single_bit_has_a_name() {
        for shift in 0..32 {
            let bit = RecalcFlags::from_bits_retain(1 << shift);
            assert!(bit.name().is_some(), "bit {shift} has no label");
        }
        assert_eq!(RecalcFlags::PSYS_ALL.name(), None);
        assert_eq!(RecalcFlags::NONE.name(), None);
    }

    #[test]
    fn all_excludes_provisions() {
        assert!(!RecalcFlags::ALL.intersects(RecalcFlags::PROVISION_24));
        assert!(!RecalcFlags::ALL.intersects(RecalcFlags::PROVISION_31));
        assert!(RecalcFlags::ALL.contains(RecalcFlags::NTREE_OUTPUT));
        assert!(RecalcFlags::ALL.contains(RecalcFlags::TAG_FOR_UNDO));
        assert_eq!(RecalcFlags::ALL | RecalcFlags::PROVISIONS, !RecalcFlags::NONE);
    }

    #[test]
    fn legacy_zero_exclusions() {
        let zero = recalc_flags_for_legacy_zero();
        for excluded in [
            RecalcFlags::PSYS_REDO,
            RecalcFlags::PSYS_RESET,
            RecalcFlags::PSYS_CHILD,
            RecalcFlags::PSYS_PHYS,
            RecalcFlags::ANIMATION,
            RecalcFlags::FRAME_CHANGE,
            RecalcFlags::SOURCE,
            RecalcFlags::EDITORS,
        ] {
            assert!(!zero.intersects(excluded), "{excluded} must be excluded");
        }
        assert!(zero.contains(RecalcFlags::TRANSFORM | RecalcFlags::GEOMETRY));
        assert!(zero.contains(RecalcFlags::COPY_ON_WRITE | RecalcFlags::SHADING));
    }

    #[test]
    fn display_labels() {
        assert_eq!(format!("{}", RecalcFlags::NONE), "LEGACY_0");
        assert_eq!(
            format!("{}", RecalcFlags::GEOMETRY_ALL_MODES),
            "GEOMETRY, COPY_ON_WRITE"
        );
        assert_eq!(
            format!("{:?}", RecalcFlags::SELECT),
            "RecalcFlags(SELECT)"
        );
        assert_eq!(UpdateSource::UserEdit.as_str(), "USER_EDIT");
    }

    #[test]
    fn insert_and_remove() {
        let mut flags = RecalcFlags::NONE;
        flags.insert(RecalcFlags::TRANSFORM | RecalcFlags::PROVISION_26);
        flags.remove(RecalcFlags::ALL);
        assert_eq!(flags, RecalcFlags::PROVISION_26);
    }
}
