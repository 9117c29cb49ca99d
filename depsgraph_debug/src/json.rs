// Copyright 2026 the Depsgraph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines exporter.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes one JSON object
//! per event, one event per line, to the given writer.

use std::io::{self, Write};

use serde_json::{Value, json};

use depsgraph_core::recalc::RecalcFlags;

use crate::pretty::pass_name;
use crate::recorder::{RecordedEvent, RecordedId, RecordedTag, decode};

/// Exports recorded events as JSON lines.
///
/// Every line has an `"event"` field (`tag`, `tag_dropped`, `visible` or
/// `recalc`). Flags are exported as an array of names; the legacy zero
/// request exports as an empty array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    for recorded in decode(bytes) {
        let value = match recorded {
            RecordedEvent::TagUpdate(tag) => tag_value("tag", &tag),
            RecordedEvent::TagDropped(tag) => tag_value("tag_dropped", &tag),
            RecordedEvent::VisibleRetag { graph, id, flags } => json!({
                "event": "visible",
                "graph": graph,
                "id": id_value(&id),
                "flags": flag_names(flags),
            }),
            RecordedEvent::RecalcClear { graph, pass, nodes } => json!({
                "event": "recalc",
                "graph": graph,
                "pass": pass_name(pass),
                "nodes": nodes,
            }),
        };
        serde_json::to_writer(&mut *writer, &value)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

fn tag_value(event: &str, tag: &RecordedTag) -> Value {
    json!({
        "event": event,
        "graph": tag.graph,
        "id": id_value(&tag.id),
        "flags": flag_names(tag.flags),
        "source": tag.source.as_str(),
    })
}

fn id_value(id: &RecordedId) -> Value {
    json!({
        "name": id.name,
        "index": id.index,
        "generation": id.generation,
    })
}

fn flag_names(flags: RecalcFlags) -> Vec<String> {
    flags
        .iter()
        .map(|bit| match bit.name() {
            Some(name) => name.to_owned(),
            None => format!("0x{:08x}", bit.bits()),
        })
        .collect()
}
