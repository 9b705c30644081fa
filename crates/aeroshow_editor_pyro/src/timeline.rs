// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline annotation recalculation.
//!
//! The authoring tool mirrors every scheduled trigger event as a labeled
//! annotation on the host's timeline. The pass here rebuilds the complete
//! annotation set from scratch on every call; the host applies it through
//! [`TimelineSink`]. Rebuilding rather than patching keeps the pass
//! idempotent: two runs over an unchanged store produce identical output.

use crate::store::{DroneId, PyroStore};
use crate::wire::format_float;

/// Prefix identifying annotations generated by this pass
pub const TIMELINE_LABEL_PREFIX: &str = "Pyro";

/// One pyro annotation on the host timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineAnnotation {
    /// Frame the event triggers at
    pub frame: i64,
    /// Pyro channel of the event
    pub channel: u32,
    /// Drone the event belongs to
    pub drone: DroneId,
    /// Pitch angle in degrees
    pub pitch: i32,
    /// Yaw angle in degrees
    pub yaw: i32,
    /// Roll angle in degrees
    pub roll: i32,
    /// Prefire time of the payload in seconds
    pub prefire_time: f64,
}

impl TimelineAnnotation {
    /// Display label shown on the host timeline
    pub fn label(&self) -> String {
        format!(
            "{} {} on {}, Pitch: {}, Yaw: {}, Roll: {} Prefire: {}",
            TIMELINE_LABEL_PREFIX,
            self.channel,
            self.drone,
            self.pitch,
            self.yaw,
            self.roll,
            format_float(self.prefire_time),
        )
    }
}

/// Host seam for applying annotations to the timeline
pub trait TimelineSink {
    /// Remove every annotation whose label starts with `prefix`
    fn clear_annotations_with_prefix(&mut self, prefix: &str);

    /// Insert an annotation at `frame` with the given label
    fn add_annotation(&mut self, frame: i64, label: &str);
}

/// Rebuild the consolidated annotation list from every drone's registry.
///
/// Drones enumerate in store insertion order and channels in ascending
/// order. Channels with no trigger frame recorded this session annotate
/// frame 0.
pub fn recalculate(store: &PyroStore) -> Vec<TimelineAnnotation> {
    let mut annotations = Vec::new();
    for (drone, registry) in store.drones() {
        let frames = store.trigger_frames(drone);
        for marker in registry.markers() {
            let frame = frames
                .and_then(|frames| frames.get(&marker.channel).copied())
                .unwrap_or(0);
            annotations.push(TimelineAnnotation {
                frame,
                channel: marker.channel,
                drone: drone.clone(),
                pitch: marker.pitch,
                yaw: marker.yaw,
                roll: marker.roll,
                prefire_time: marker.payload.prefire_time,
            });
        }
    }
    annotations
}

/// Clear previously generated pyro annotations and re-emit the current set
pub fn apply_to_timeline(store: &PyroStore, sink: &mut dyn TimelineSink) {
    sink.clear_annotations_with_prefix(TIMELINE_LABEL_PREFIX);
    for annotation in recalculate(store) {
        sink.add_annotation(annotation.frame, &annotation.label());
    }
}
