// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. Names are stored length-prefixed.
//! [`decode`] reads them back as an iterator of owned [`RecordedEvent`]s.

use depsgraph_core::graph::GraphId;
use depsgraph_core::id::IdRef;
use depsgraph_core::recalc::{RecalcFlags, UpdateSource};
use depsgraph_core::trace::{
    RecalcClearEvent, RecalcPass, TagDroppedEvent, TagUpdateEvent, TraceSink, VisibleRetagEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_UPDATE: u8 = 1;
const TAG_DROPPED: u8 = 2;
const TAG_VISIBLE_RETAG: u8 = 3;
const TAG_RECALC_CLEAR: u8 = 4;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_graph(&mut self, graph: Option<GraphId>) {
        match graph {
            Some(graph) => {
                self.write_u8(1);
                self.write_u32(graph.index());
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
            }
        }
    }

    fn write_id(&mut self, id: IdRef, name: &str) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
        // Names longer than u32::MAX bytes are truncated.
        let len = u32::try_from(name.len()).unwrap_or(u32::MAX);
        self.write_u32(len);
        self.buf
            .extend_from_slice(&name.as_bytes()[..len as usize]);
    }

    fn write_source(&mut self, source: UpdateSource) {
        self.write_u8(match source {
            UpdateSource::Time => 0,
            UpdateSource::UserEdit => 1,
            UpdateSource::Relations => 2,
            UpdateSource::Visibility => 3,
        });
    }

    fn write_pass(&mut self, pass: RecalcPass) {
        self.write_u8(match pass {
            RecalcPass::Clear => 0,
            RecalcPass::ClearWithBackup => 1,
            RecalcPass::Restore => 2,
        });
    }

    fn write_tag(
        &mut self,
        kind: u8,
        graph: Option<GraphId>,
        id: IdRef,
        name: &str,
        flags: RecalcFlags,
        source: UpdateSource,
    ) {
        self.write_u8(kind);
        self.write_graph(graph);
        self.write_id(id, name);
        self.write_u32(flags.bits());
        self.write_source(source);
    }
}

impl TraceSink for RecorderSink {
    fn on_tag_update(&mut self, e: &TagUpdateEvent<'_>) {
        self.write_tag(TAG_UPDATE, e.graph, e.id, e.name, e.flags, e.source);
    }

    fn on_tag_dropped(&mut self, e: &TagDroppedEvent<'_>) {
        self.write_tag(TAG_DROPPED, e.graph, e.id, e.name, e.flags, e.source);
    }

    fn on_visible_retag(&mut self, e: &VisibleRetagEvent<'_>) {
        self.write_u8(TAG_VISIBLE_RETAG);
        self.write_graph(e.graph);
        self.write_id(e.id, e.name);
        self.write_u32(e.flags.bits());
    }

    fn on_recalc_clear(&mut self, e: &RecalcClearEvent) {
        self.write_u8(TAG_RECALC_CLEAR);
        self.write_graph(e.graph);
        self.write_pass(e.pass);
        self.write_u32(e.nodes);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A data-block as seen in a recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedId {
    /// Slot index of the handle.
    pub index: u32,
    /// Generation of the handle.
    pub generation: u32,
    /// Full name at the time of the event.
    pub name: String,
}

/// A tag request as seen in a recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedTag {
    /// Registry index of the graph, `None` for the graph-less pass.
    pub graph: Option<u32>,
    /// Tagged data-block.
    pub id: RecordedId,
    /// Requested flags.
    pub flags: RecalcFlags,
    /// Source of the request.
    pub source: UpdateSource,
}

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`TagUpdateEvent`].
    TagUpdate(RecordedTag),
    /// A [`TagDroppedEvent`].
    TagDropped(RecordedTag),
    /// A [`VisibleRetagEvent`].
    VisibleRetag {
        /// Registry index of the graph.
        graph: Option<u32>,
        /// Re-tagged data-block.
        id: RecordedId,
        /// Flags the pass tagged with.
        flags: RecalcFlags,
    },
    /// A [`RecalcClearEvent`].
    RecalcClear {
        /// Registry index of the graph.
        graph: Option<u32>,
        /// Which pass ran.
        pass: RecalcPass,
        /// Number of ID nodes visited.
        nodes: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first truncated or unknown record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_graph(&mut self) -> Option<Option<u32>> {
        let present = self.read_u8()?;
        let val = self.read_u32()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_id(&mut self) -> Option<RecordedId> {
        let index = self.read_u32()?;
        let generation = self.read_u32()?;
        let len = self.read_u32()? as usize;
        if self.remaining() < len {
            return None;
        }
        let name = String::from_utf8_lossy(&self.data[self.pos..self.pos + len]).into_owned();
        self.pos += len;
        Some(RecordedId {
            index,
            generation,
            name,
        })
    }

    fn read_flags(&mut self) -> Option<RecalcFlags> {
        self.read_u32().map(RecalcFlags::from_bits_retain)
    }

    fn read_source(&mut self) -> Option<UpdateSource> {
        Some(match self.read_u8()? {
            0 => UpdateSource::Time,
            1 => UpdateSource::UserEdit,
            2 => UpdateSource::Relations,
            3 => UpdateSource::Visibility,
            _ => return None,
        })
    }

    fn read_pass(&mut self) -> Option<RecalcPass> {
        Some(match self.read_u8()? {
            0 => RecalcPass::Clear,
            1 => RecalcPass::ClearWithBackup,
            2 => RecalcPass::Restore,
            _ => return None,
        })
    }

    fn decode_tag(&mut self) -> Option<RecordedTag> {
        Some(RecordedTag {
            graph: self.read_graph()?,
            id: self.read_id()?,
            flags: self.read_flags()?,
            source: self.read_source()?,
        })
    }

    fn decode_visible_retag(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::VisibleRetag {
            graph: self.read_graph()?,
            id: self.read_id()?,
            flags: self.read_flags()?,
        })
    }

    fn decode_recalc_clear(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RecalcClear {
            graph: self.read_graph()?,
            pass: self.read_pass()?,
            nodes: self.read_u32()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<RecordedEvent> {
        match self.read_u8()? {
            TAG_UPDATE => self.decode_tag().map(RecordedEvent::TagUpdate),
            TAG_DROPPED => self.decode_tag().map(RecordedEvent::TagDropped),
            TAG_VISIBLE_RETAG => self.decode_visible_retag(),
            TAG_RECALC_CLEAR => self.decode_recalc_clear(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
