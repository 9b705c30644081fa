// SPDX-License-Identifier: MIT OR Apache-2.0
//! Overlay state for pyro markers.
//!
//! The original plugin kept the overlay handle and a suspension counter in
//! module-level globals; here both live in an explicit context the host
//! owns. A single control thread drives everything, so the suspension latch
//! is a reentrancy counter, not a lock.

use std::cell::Cell;
use std::rc::Rc;

use aeroshow_editor_pyro::{DroneId, PyroStore};

use crate::transform::compute_direction_indicators;

/// RGB color used on the overlay
pub type Color = [f32; 3];

/// Default color of the drone position marker
pub const DEFAULT_MARKER_COLOR: Color = [0.5, 0.5, 0.5];

/// Default color of the firing-direction indicator
pub const DEFAULT_DIRECTION_COLOR: Color = [1.0, 0.3, 0.1];

/// Default color of the yaw indicator
pub const DEFAULT_YAW_COLOR: Color = [0.2, 0.6, 1.0];

/// Visualization mode of pyro effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visualization {
    /// No rendering: quick but invisible
    None,
    /// Overlay markers: simple but quick
    #[default]
    Markers,
    /// Particle systems, rendered by the host
    Particles,
}

/// A single point on the overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayMarker {
    /// World position of the point
    pub position: [f32; 3],
    /// Marker color
    pub color: Color,
}

/// Reentrant on/off latch parking overlay refreshes during bulk edits.
///
/// Entering returns a guard; the latch stays suspended until every live
/// guard has dropped, so nested suspension regions compose.
#[derive(Debug, Clone, Default)]
pub struct SuspensionLatch {
    depth: Rc<Cell<u32>>,
}

impl SuspensionLatch {
    /// Suspend overlay refreshes for the lifetime of the returned guard
    pub fn suspend(&self) -> SuspensionGuard {
        self.depth.set(self.depth.get() + 1);
        SuspensionGuard {
            depth: Rc::clone(&self.depth),
        }
    }

    /// Whether any suspension guard is alive
    pub fn is_suspended(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Guard returned by [`SuspensionLatch::suspend`]; releases on drop
#[derive(Debug)]
pub struct SuspensionGuard {
    depth: Rc<Cell<u32>>,
}

impl Drop for SuspensionGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// Overlay state: visualization mode, current marker geometry and the
/// suspension latch.
#[derive(Debug, Default)]
pub struct OverlayContext {
    /// Active visualization mode
    pub visualization: Visualization,
    markers: Vec<OverlayMarker>,
    latch: SuspensionLatch,
}

impl OverlayContext {
    /// Create a context with the default visualization mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Current overlay markers, in emission order
    pub fn markers(&self) -> &[OverlayMarker] {
        &self.markers
    }

    /// Whether the overlay draws anything in the current mode
    pub fn is_enabled(&self) -> bool {
        self.visualization == Visualization::Markers
    }

    /// The suspension latch gating [`OverlayContext::refresh`]
    pub fn latch(&self) -> &SuspensionLatch {
        &self.latch
    }

    /// Drop all overlay markers
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Rebuild overlay geometry for the given animation frame.
    ///
    /// Skipped entirely while suspended. In `Markers` mode, every drone
    /// with a trigger event recorded at `frame` emits its position marker
    /// plus the two direction indicators; in any other mode the overlay is
    /// cleared. `position_of` supplies drone world positions; drones the
    /// host cannot locate are skipped.
    pub fn refresh<F>(&mut self, store: &PyroStore, frame: i64, position_of: F)
    where
        F: Fn(&DroneId) -> Option<[f32; 3]>,
    {
        if self.latch.is_suspended() {
            return;
        }

        self.markers.clear();
        if !self.is_enabled() {
            return;
        }

        for (drone, registry) in store.drones() {
            let Some(frames) = store.trigger_frames(drone) else {
                continue;
            };
            for marker in registry.markers() {
                if frames.get(&marker.channel).copied() != Some(frame) {
                    continue;
                }
                let Some(position) = position_of(drone) else {
                    continue;
                };

                self.markers.push(OverlayMarker {
                    position,
                    color: DEFAULT_MARKER_COLOR,
                });

                let (direction, yaw) = compute_direction_indicators(
                    marker.pitch as f32,
                    marker.yaw as f32,
                    marker.roll as f32,
                    position,
                );
                self.markers.push(OverlayMarker {
                    position: direction,
                    color: DEFAULT_DIRECTION_COLOR,
                });
                self.markers.push(OverlayMarker {
                    position: yaw,
                    color: DEFAULT_YAW_COLOR,
                });
            }
        }

        tracing::trace!("Pyro overlay rebuilt with {} markers", self.markers.len());
    }
}
