// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-drone pyro marker registry.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::error::{MarkerError, Result};
use crate::marker::Marker;
use crate::wire::{self, WireDocument};

/// Trigger frames recorded per channel by the store, used for wire export
pub type TriggerFrames = BTreeMap<u32, i64>;

/// Pyro marker registry for a single drone.
///
/// Each pyro channel carries at most one trigger event. Channels enumerate
/// in ascending order, which makes the persisted form and every export
/// deterministic regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    markers: BTreeMap<u32, Marker>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a marker at its channel, replacing and returning any marker
    /// already stored there (last write wins).
    pub fn add(&mut self, marker: Marker) -> Option<Marker> {
        self.markers.insert(marker.channel, marker)
    }

    /// Remove the marker on a channel. Removing an empty channel is a no-op.
    pub fn remove(&mut self, channel: u32) -> Option<Marker> {
        self.markers.remove(&channel)
    }

    /// Get the marker on a channel
    pub fn get(&self, channel: u32) -> Option<&Marker> {
        self.markers.get(&channel)
    }

    /// Iterate markers in ascending channel order
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    /// Number of scheduled trigger events
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the registry holds no trigger events
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Whether the pyro on `channel` is burning at `frame`.
    ///
    /// Always reports `false`: markers do not store their firing frame, so
    /// there is no window to test against. Kept as the single place where a
    /// real duration check belongs.
    /// TODO: derive the active window from the payload duration once trigger
    /// frames are persisted alongside markers.
    pub fn is_active_at(&self, _channel: u32, _frame: i64, _fps: f64) -> bool {
        false
    }

    /// Shift all trigger events in time by `frame_delta` frames.
    ///
    /// A no-op for the same reason [`Registry::is_active_at`] is inert:
    /// there are no stored frames to shift.
    pub fn shift_frames(&mut self, _frame_delta: i64) {}

    /// Serialize to the persisted string form.
    ///
    /// The output is a JSON object keyed by stringified channel numbers in
    /// ascending order; an empty registry serializes to the empty string.
    pub fn serialize(&self) -> String {
        if self.markers.is_empty() {
            return String::new();
        }

        let mut doc = Map::new();
        for (channel, marker) in &self.markers {
            doc.insert(channel.to_string(), marker_record(marker));
        }
        Value::Object(doc).to_string()
    }

    /// Parse the persisted string form.
    ///
    /// Empty input yields an empty registry. Input that is not a JSON object
    /// fails with [`MarkerError::MalformedDocument`]; entry records missing
    /// `channel` or `payload` fail with [`MarkerError::MissingField`]. No
    /// partial registry escapes on failure.
    pub fn deserialize(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::new());
        }

        let doc: Value = serde_json::from_str(data)
            .map_err(|err| MarkerError::MalformedDocument(err.to_string()))?;
        let entries = doc
            .as_object()
            .ok_or_else(|| MarkerError::MalformedDocument("expected a JSON object".into()))?;

        let mut registry = Self::new();
        for (key, record) in entries {
            let channel = key.trim().parse().map_err(|_| MarkerError::InvalidNumber {
                field: "channel",
                value: key.clone(),
            })?;
            registry.markers.insert(channel, Marker::from_record(record)?);
        }
        Ok(registry)
    }

    /// Like [`Registry::deserialize`], but tolerates legacy or corrupt data
    /// by falling back to an empty registry.
    pub fn deserialize_lossy(data: &str) -> Self {
        match Self::deserialize(data) {
            Ok(registry) => registry,
            Err(err) => {
                tracing::warn!("Discarding unreadable pyro markers: {}", err);
                Self::new()
            }
        }
    }

    /// Export to the scheduling-service wire format.
    ///
    /// `frames` is the store's trigger-frame table for this drone; channels
    /// absent from it export as frame 0. `frame / fps` is rounded to
    /// `precision` digits. See [`crate::wire`] for the packed encoding.
    pub fn export_to_wire(
        &self,
        frames: &TriggerFrames,
        fps: f64,
        precision: u32,
    ) -> WireDocument {
        wire::pack_registry(self, frames, fps, precision)
    }
}

/// Persisted record shape of one marker.
fn marker_record(marker: &Marker) -> Value {
    json!({
        "channel": marker.channel,
        "pitch": marker.pitch,
        "yaw": marker.yaw,
        "roll": marker.roll,
        "payload": {
            "name": marker.payload.name,
            "duration": marker.payload.duration,
            "prefire_time": marker.payload.prefire_time,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;

    fn marker(channel: u32) -> Marker {
        Marker::new(channel, Payload::new("Gold Gerb"))
    }

    #[test]
    fn test_round_trip() {
        let mut registry = Registry::new();
        registry.add(marker(5).with_orientation(10, -20, 30));
        registry.add(Marker::new(
            2,
            Payload::new("Comet").with_duration(8.0).with_prefire_time(0.4),
        ));
        registry.add(marker(9));

        let restored = Registry::deserialize(&registry.serialize()).unwrap();
        assert_eq!(restored, registry);
    }

    #[test]
    fn test_serialize_orders_channels_numerically() {
        let mut registry = Registry::new();
        registry.add(marker(10));
        registry.add(marker(2));

        let data = registry.serialize();
        let two = data.find("\"2\"").unwrap();
        let ten = data.find("\"10\"").unwrap();
        assert!(two < ten, "channel 2 must precede channel 10 in {data}");
    }

    #[test]
    fn test_add_overwrites_same_channel() {
        let mut registry = Registry::new();
        registry.add(marker(3).with_orientation(1, 2, 3));
        let displaced = registry.add(Marker::new(3, Payload::new("Strobe")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(3).unwrap().payload.name, "Strobe");
        assert_eq!(displaced.unwrap().payload.name, "Gold Gerb");
    }

    #[test]
    fn test_remove_absent_channel_is_noop() {
        let mut registry = Registry::new();
        registry.add(marker(1));
        assert!(registry.remove(4).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_registry_serializes_to_empty_string() {
        assert_eq!(Registry::new().serialize(), "");
        assert!(Registry::deserialize("").unwrap().is_empty());
        // Older versions persisted empty registries as an empty object.
        assert!(Registry::deserialize("{}").unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_malformed_document() {
        let err = Registry::deserialize("not json").unwrap_err();
        assert!(matches!(err, MarkerError::MalformedDocument(_)));

        let err = Registry::deserialize("[1, 2]").unwrap_err();
        assert!(matches!(err, MarkerError::MalformedDocument(_)));
    }

    #[test]
    fn test_deserialize_entry_missing_payload() {
        let err = Registry::deserialize(r#"{"3": {"channel": 3}}"#).unwrap_err();
        assert!(matches!(err, MarkerError::MissingField("payload")));
    }

    #[test]
    fn test_deserialize_non_numeric_key() {
        let data = r#"{"x": {"channel": 3, "payload": {"name": "Comet"}}}"#;
        let err = Registry::deserialize(data).unwrap_err();
        assert!(matches!(err, MarkerError::InvalidNumber { field: "channel", .. }));
    }

    #[test]
    fn test_deserialize_lossy_recovers_to_empty() {
        assert!(Registry::deserialize_lossy("not json").is_empty());

        let mut registry = Registry::new();
        registry.add(marker(1));
        assert_eq!(Registry::deserialize_lossy(&registry.serialize()), registry);
    }

    #[test]
    fn test_is_active_at_is_permanently_false() {
        // Frozen stub behavior: flipping this to a real duration check must
        // be a deliberate, reviewed change.
        let mut registry = Registry::new();
        registry.add(marker(3));
        for frame in [0, 1, 100, 10_000] {
            assert!(!registry.is_active_at(3, frame, 25.0));
        }
        assert!(!registry.is_active_at(99, 0, 25.0));
    }

    #[test]
    fn test_shift_frames_is_inert() {
        let mut registry = Registry::new();
        registry.add(marker(3));
        let before = registry.clone();
        registry.shift_frames(250);
        assert_eq!(registry, before);
    }

    #[test]
    fn test_export_empty() {
        let doc = Registry::new().export_to_wire(&TriggerFrames::new(), 25.0, 3);
        assert_eq!(doc, WireDocument::empty());
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"version":1,"events":[],"payloads":{}}"#
        );
    }

    #[test]
    fn test_export_single_marker_scenario() {
        let mut registry = Registry::new();
        registry.add(marker(3).with_orientation(0, 90, 0));

        let doc = registry.export_to_wire(&TriggerFrames::new(), 25.0, 3);
        assert_eq!(doc.version, 1);
        assert_eq!(doc.events, vec![crate::wire::WireEvent(0.0, 1, "1".to_string())]);
        assert_eq!(doc.payloads.len(), 1);

        let payload = &doc.payloads["1"];
        assert_eq!(payload.name, "[[0.0, 3]]");
        assert_eq!(payload.duration, 30.0);
        assert_eq!(payload.prefire_time, 0.0);
    }

    #[test]
    fn test_export_packs_all_markers_into_one_payload() {
        let mut registry = Registry::new();
        registry.add(Marker::new(8, Payload::new("Strobe").with_duration(5.0)));
        registry.add(marker(3));

        let frames = TriggerFrames::from([(3, 50), (8, 101)]);
        let doc = registry.export_to_wire(&frames, 25.0, 3);

        // One degenerate event regardless of marker count; real durations
        // are not carried.
        assert_eq!(doc.events.len(), 1);
        let payload = &doc.payloads["1"];
        assert_eq!(payload.name, "[[2.0, 3], [4.04, 8]]");
        assert_eq!(payload.duration, 30.0);
    }

    #[test]
    fn test_export_defaults_untracked_channels_to_frame_zero() {
        let mut registry = Registry::new();
        registry.add(marker(3));
        registry.add(marker(6));

        let frames = TriggerFrames::from([(6, 25)]);
        let doc = registry.export_to_wire(&frames, 25.0, 3);
        assert_eq!(doc.payloads["1"].name, "[[0.0, 3], [1.0, 6]]");
    }
}
