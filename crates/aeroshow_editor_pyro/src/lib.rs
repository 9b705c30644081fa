// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pyro trigger registry and export engine for AeroShow Editor.
//!
//! This crate is the drone-show pyro core:
//! - Per-drone marker registries with deterministic persistence
//! - Wire export for the external scheduling service
//! - A host-facing store that tracks trigger frames per session
//! - Timeline annotation recalculation
//!
//! ## Architecture
//!
//! The engine is built on:
//! - Channel-keyed marker registries (one pyro event per channel)
//! - JSON persistence with ascending-channel ordering
//! - A store keyed by drone identity, created on first trigger and torn
//!   down with the drone
//!
//! Everything here is synchronous, single-threaded computation driven by the
//! host's event callbacks; rendering and UI stay in the host.

pub mod error;
pub mod marker;
pub mod payload;
pub mod registry;
pub mod store;
pub mod timeline;
pub mod wire;

pub use error::{MarkerError, Result};
pub use marker::Marker;
pub use payload::Payload;
pub use registry::{Registry, TriggerFrames};
pub use store::{DroneId, PyroStore};
pub use timeline::{
    apply_to_timeline, recalculate, TimelineAnnotation, TimelineSink, TIMELINE_LABEL_PREFIX,
};
pub use wire::{WireDocument, WireEvent, WirePayload, WIRE_FORMAT_VERSION};
