// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::fmt;
use std::io::Write;

use depsgraph_core::graph::GraphId;
use depsgraph_core::trace::{
    RecalcClearEvent, RecalcPass, TagDroppedEvent, TagUpdateEvent, TraceSink, VisibleRetagEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Graph column: the registry index, or `-` for the graph-less pass.
struct GraphLabel(Option<GraphId>);

impl fmt::Display for GraphLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(graph) => write!(f, "{}", graph.index()),
            None => f.write_str("-"),
        }
    }
}

pub(crate) fn pass_name(pass: RecalcPass) -> &'static str {
    match pass {
        RecalcPass::Clear => "clear",
        RecalcPass::ClearWithBackup => "clear+backup",
        RecalcPass::Restore => "restore",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tag_update(&mut self, e: &TagUpdateEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[tag] graph={} id={} flags={} source={}",
            GraphLabel(e.graph),
            e.name,
            e.flags,
            e.source,
        );
    }

    fn on_tag_dropped(&mut self, e: &TagDroppedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[tag:dropped] graph={} id={} flags={} source={} (evaluating)",
            GraphLabel(e.graph),
            e.name,
            e.flags,
            e.source,
        );
    }

    fn on_visible_retag(&mut self, e: &VisibleRetagEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[visible] graph={} id={} flags={}",
            GraphLabel(e.graph),
            e.name,
            e.flags,
        );
    }

    fn on_recalc_clear(&mut self, e: &RecalcClearEvent) {
        let _ = writeln!(
            self.writer,
            "[recalc] graph={} pass={} nodes={}",
            GraphLabel(e.graph),
            pass_name(e.pass),
            e.nodes,
        );
    }
}

#[cfg(test)]
mod tests {
    use depsgraph_core::datablock::Main;
    use depsgraph_core::id::IdType;
    use depsgraph_core::recalc::{RecalcFlags, UpdateSource};

    use super::*;

    #[test]
    fn pretty_print_tag() {
        let mut main = Main::new();
        let id = main.add(IdType::Mesh, "Cube");
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tag_update(&TagUpdateEvent {
            graph: None,
            id,
            name: "MECube",
            flags: RecalcFlags::GEOMETRY | RecalcFlags::SHADING,
            source: UpdateSource::UserEdit,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            output,
            "[tag] graph=- id=MECube flags=GEOMETRY, SHADING source=USER_EDIT\n"
        );
    }

    #[test]
    fn pretty_print_legacy_and_clear() {
        let mut main = Main::new();
        let id = main.add(IdType::Mesh, "Cube");
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tag_dropped(&TagDroppedEvent {
            graph: None,
            id,
            name: "MECube",
            flags: RecalcFlags::NONE,
            source: UpdateSource::Time,
        });
        sink.on_recalc_clear(&RecalcClearEvent {
            graph: None,
            pass: RecalcPass::ClearWithBackup,
            nodes: 4,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("flags=LEGACY_0 source=TIME"), "got: {output}");
        assert!(output.contains("[recalc] graph=- pass=clear+backup nodes=4"), "got: {output}");
    }
}
