// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pyro overlay state and orientation transforms for AeroShow Editor.
//!
//! This crate turns scheduled pyro trigger events into overlay geometry:
//! - Axis-angle rotation and direction-indicator math
//! - Overlay marker collection per animation frame
//! - A suspension latch that parks refreshes during bulk edits
//!
//! Rendering stays in the host; the overlay context only produces positions
//! and colors.

pub mod context;
pub mod transform;

pub use context::{
    Color, OverlayContext, OverlayMarker, SuspensionGuard, SuspensionLatch, Visualization,
    DEFAULT_DIRECTION_COLOR, DEFAULT_MARKER_COLOR, DEFAULT_YAW_COLOR,
};
pub use transform::{compute_direction_indicators, rotate};
