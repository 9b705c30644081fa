// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host-facing store of per-drone registries.
//!
//! The host owns drone objects; the store mirrors them with one registry
//! per drone, keyed by the drone's identity. Entries appear on the first
//! trigger and are torn down when the host reports drone deletion. The
//! store also remembers, per channel, the animation frame each trigger was
//! added at; those frames are session state and are never persisted.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::marker::Marker;
use crate::registry::{Registry, TriggerFrames};
use crate::wire::WireDocument;

/// Identifier of a drone: the host object's name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DroneId(pub String);

impl DroneId {
    /// Create a drone id
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for DroneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DroneId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Registry plus the session-only trigger frame table for one drone
#[derive(Debug, Clone, Default)]
struct DroneState {
    registry: Registry,
    trigger_frames: TriggerFrames,
}

/// All drones' pyro registries, keyed by drone identity.
#[derive(Debug, Default)]
pub struct PyroStore {
    drones: IndexMap<DroneId, DroneState>,
}

impl PyroStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a trigger event on a drone at the given frame.
    ///
    /// The marker lands on its channel, replacing any event already there,
    /// and the frame is recorded as the channel's trigger frame.
    pub fn add_marker(&mut self, drone: &DroneId, frame: i64, marker: Marker) {
        let state = self.drones.entry(drone.clone()).or_default();
        let channel = marker.channel;
        if state.registry.add(marker).is_some() {
            tracing::debug!("Replacing pyro marker on channel {} of {}", channel, drone);
        }
        state.trigger_frames.insert(channel, frame);
    }

    /// Remove the trigger events recorded at the given frame.
    ///
    /// No-op when the drone is unknown or nothing was triggered at that
    /// frame.
    pub fn remove_marker(&mut self, drone: &DroneId, frame: i64) {
        let Some(state) = self.drones.get_mut(drone) else {
            return;
        };

        let channels: Vec<u32> = state
            .trigger_frames
            .iter()
            .filter(|&(_, &f)| f == frame)
            .map(|(&channel, _)| channel)
            .collect();
        for channel in channels {
            state.registry.remove(channel);
            state.trigger_frames.remove(&channel);
        }
    }

    /// Remove the trigger event on a specific channel; no-op if absent
    pub fn remove_channel(&mut self, drone: &DroneId, channel: u32) {
        if let Some(state) = self.drones.get_mut(drone) {
            state.registry.remove(channel);
            state.trigger_frames.remove(&channel);
        }
    }

    /// Get the registry of a drone
    pub fn get_registry(&self, drone: &DroneId) -> Option<&Registry> {
        self.drones.get(drone).map(|state| &state.registry)
    }

    /// Replace the registry of a drone, e.g. after loading persisted data.
    ///
    /// Trigger frames recorded for channels no longer present are dropped.
    pub fn set_registry(&mut self, drone: &DroneId, registry: Registry) {
        let state = self.drones.entry(drone.clone()).or_default();
        state
            .trigger_frames
            .retain(|channel, _| registry.get(*channel).is_some());
        state.registry = registry;
    }

    /// Trigger frames recorded for a drone this session
    pub fn trigger_frames(&self, drone: &DroneId) -> Option<&TriggerFrames> {
        self.drones.get(drone).map(|state| &state.trigger_frames)
    }

    /// Tear down a drone's entry when the drone itself is deleted
    pub fn remove_drone(&mut self, drone: &DroneId) {
        if self.drones.shift_remove(drone).is_some() {
            tracing::debug!("Dropped pyro registry of {}", drone);
        }
    }

    /// Export one drone's registry to the scheduling-service wire format.
    ///
    /// An unknown drone exports as the empty document.
    pub fn export(&self, drone: &DroneId, fps: f64, precision: u32) -> WireDocument {
        match self.drones.get(drone) {
            Some(state) => state
                .registry
                .export_to_wire(&state.trigger_frames, fps, precision),
            None => WireDocument::empty(),
        }
    }

    /// Iterate drones and their registries in insertion order
    pub fn drones(&self) -> impl Iterator<Item = (&DroneId, &Registry)> {
        self.drones.iter().map(|(id, state)| (id, &state.registry))
    }

    /// Number of drones with a registry
    pub fn len(&self) -> usize {
        self.drones.len()
    }

    /// Whether the store has no drones
    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;

    fn marker(channel: u32) -> Marker {
        Marker::new(channel, Payload::new("Gold Gerb"))
    }

    #[test]
    fn test_add_creates_drone_entry() {
        let mut store = PyroStore::new();
        assert!(store.is_empty());

        let drone = DroneId::from("Drone 1");
        store.add_marker(&drone, 100, marker(3));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_registry(&drone).unwrap().len(), 1);
        assert_eq!(store.trigger_frames(&drone).unwrap()[&3], 100);
    }

    #[test]
    fn test_add_same_channel_updates_trigger_frame() {
        let mut store = PyroStore::new();
        let drone = DroneId::from("Drone 1");
        store.add_marker(&drone, 100, marker(3));
        store.add_marker(&drone, 250, marker(3));

        assert_eq!(store.get_registry(&drone).unwrap().len(), 1);
        assert_eq!(store.trigger_frames(&drone).unwrap()[&3], 250);
    }

    #[test]
    fn test_remove_marker_by_frame() {
        let mut store = PyroStore::new();
        let drone = DroneId::from("Drone 1");
        store.add_marker(&drone, 100, marker(3));
        store.add_marker(&drone, 200, marker(5));

        store.remove_marker(&drone, 100);
        let registry = store.get_registry(&drone).unwrap();
        assert!(registry.get(3).is_none());
        assert!(registry.get(5).is_some());

        // Unknown frame and unknown drone are both no-ops.
        store.remove_marker(&drone, 999);
        store.remove_marker(&DroneId::from("Drone 2"), 100);
        assert_eq!(store.get_registry(&drone).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_channel() {
        let mut store = PyroStore::new();
        let drone = DroneId::from("Drone 1");
        store.add_marker(&drone, 100, marker(3));

        store.remove_channel(&drone, 3);
        assert!(store.get_registry(&drone).unwrap().is_empty());
        assert!(store.trigger_frames(&drone).unwrap().is_empty());
    }

    #[test]
    fn test_set_registry_prunes_stale_trigger_frames() {
        let mut store = PyroStore::new();
        let drone = DroneId::from("Drone 1");
        store.add_marker(&drone, 100, marker(3));
        store.add_marker(&drone, 150, marker(5));

        let mut reloaded = Registry::new();
        reloaded.add(marker(5));
        store.set_registry(&drone, reloaded);

        let frames = store.trigger_frames(&drone).unwrap();
        assert!(frames.get(&3).is_none());
        assert_eq!(frames[&5], 150);
    }

    #[test]
    fn test_export_uses_tracked_frames() {
        let mut store = PyroStore::new();
        let drone = DroneId::from("Drone 1");
        store.add_marker(&drone, 50, marker(3));

        let doc = store.export(&drone, 25.0, 3);
        assert_eq!(doc.payloads["1"].name, "[[2.0, 3]]");
    }

    #[test]
    fn test_export_unknown_drone_is_empty() {
        let store = PyroStore::new();
        let doc = store.export(&DroneId::from("Drone 1"), 25.0, 3);
        assert_eq!(doc, WireDocument::empty());
    }

    #[test]
    fn test_remove_drone() {
        let mut store = PyroStore::new();
        let drone = DroneId::from("Drone 1");
        store.add_marker(&drone, 100, marker(3));

        store.remove_drone(&drone);
        assert!(store.is_empty());
        assert!(store.get_registry(&drone).is_none());
    }

    #[test]
    fn test_drones_iterate_in_insertion_order() {
        let mut store = PyroStore::new();
        store.add_marker(&DroneId::from("Drone B"), 1, marker(1));
        store.add_marker(&DroneId::from("Drone A"), 1, marker(1));

        let order: Vec<&str> = store.drones().map(|(id, _)| id.0.as_str()).collect();
        assert_eq!(order, ["Drone B", "Drone A"]);
    }
}
