// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pyro payload descriptor.

use crate::wire::WirePayload;

/// Default payload burn duration, in seconds
pub const DEFAULT_DURATION: f64 = 30.0;

/// Properties of a pyro payload attached to a trigger event.
///
/// A payload is owned by exactly one marker and is treated as an immutable
/// value. Out-of-range numeric values are accepted as-is; validation happens
/// in the external scheduling service.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    /// Name of the pyro effect to trigger
    pub name: String,
    /// Overall duration of the pyro effect, in seconds
    pub duration: f64,
    /// Time needed for the payload to show up after ignition, in seconds
    pub prefire_time: f64,
}

impl Payload {
    /// Create a payload with the default duration and no prefire time
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: DEFAULT_DURATION,
            prefire_time: 0.0,
        }
    }

    /// Set the burn duration
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the prefire time
    pub fn with_prefire_time(mut self, prefire_time: f64) -> Self {
        self.prefire_time = prefire_time;
        self
    }

    /// Convert to the scheduling-service wire representation.
    ///
    /// The wire boundary uses camel case: `prefire_time` becomes
    /// `prefireTime`.
    pub fn to_wire(&self) -> WirePayload {
        WirePayload {
            name: self.name.clone(),
            duration: self.duration,
            prefire_time: self.prefire_time,
        }
    }
}
