// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wire format consumed by the external scheduling service.
//!
//! The document shape is
//! `{version, events: [[frameSeconds, slot, id], ...], payloads: {id -> payload}}`.
//! The deployed encoding packs every event of a drone into a single slot:
//! the document carries one degenerate `[0, 1, "1"]` event, and the real
//! `[frame_seconds, channel]` pairs are rendered into the name of payload
//! `"1"`. This is the contract the scheduling service ships against today,
//! so the packing is preserved verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::registry::{Registry, TriggerFrames};

/// Version of the wire export document format
pub const WIRE_FORMAT_VERSION: u32 = 1;

/// Slot index used by the packed event entry
const PACKED_SLOT: u32 = 1;

/// Event/payload id used by the packed event entry
const PACKED_EVENT_ID: &str = "1";

/// Placeholder duration reported for the packed payload; the real per-marker
/// durations are not part of the packed encoding
const PACKED_PAYLOAD_DURATION: f64 = 30.0;

/// One scheduled event entry, serialized as `[frameSeconds, slot, id]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEvent(pub f64, pub u32, pub String);

/// Payload descriptor in the wire document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePayload {
    /// Effect name (or, in the packed encoding, the rendered event list)
    pub name: String,
    /// Duration in seconds
    pub duration: f64,
    /// Prefire time in seconds
    #[serde(rename = "prefireTime")]
    pub prefire_time: f64,
}

/// Document consumed by the external scheduling service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDocument {
    /// Format version
    pub version: u32,
    /// Scheduled event entries
    pub events: Vec<WireEvent>,
    /// Payload descriptors keyed by event id
    pub payloads: BTreeMap<String, WirePayload>,
}

impl WireDocument {
    /// The export of a drone with no trigger events
    pub fn empty() -> Self {
        Self {
            version: WIRE_FORMAT_VERSION,
            events: Vec::new(),
            payloads: BTreeMap::new(),
        }
    }
}

impl Default for WireDocument {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pack a registry into the wire document, one slot for all events.
pub(crate) fn pack_registry(
    registry: &Registry,
    frames: &TriggerFrames,
    fps: f64,
    precision: u32,
) -> WireDocument {
    if registry.is_empty() {
        return WireDocument::empty();
    }

    // Channels with no trigger frame recorded this session export as frame 0.
    let pairs: Vec<(f64, u32)> = registry
        .markers()
        .map(|marker| {
            let frame = frames.get(&marker.channel).copied().unwrap_or(0);
            (round_to(frame as f64 / fps, precision), marker.channel)
        })
        .collect();

    let payload = WirePayload {
        name: format_event_list(&pairs),
        duration: PACKED_PAYLOAD_DURATION,
        prefire_time: 0.0,
    };

    WireDocument {
        version: WIRE_FORMAT_VERSION,
        events: vec![WireEvent(0.0, PACKED_SLOT, PACKED_EVENT_ID.to_string())],
        payloads: BTreeMap::from([(PACKED_EVENT_ID.to_string(), payload)]),
    }
}

/// Render `[frame_seconds, channel]` pairs as the packed payload name.
pub(crate) fn format_event_list(pairs: &[(f64, u32)]) -> String {
    let items: Vec<String> = pairs
        .iter()
        .map(|(seconds, channel)| format!("[{}, {}]", format_float(*seconds), channel))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Render a float with the list syntax the scheduling service parses:
/// integral values keep a trailing `.0`.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Round to a fixed number of decimal digits.
pub(crate) fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
