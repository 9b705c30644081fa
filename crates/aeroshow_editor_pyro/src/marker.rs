// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pyro trigger marker.

use serde_json::Value;

use crate::error::{MarkerError, Result};
use crate::payload::{Payload, DEFAULT_DURATION};

/// One scheduled pyro trigger event on a specific drone channel.
///
/// A channel carries at most one trigger event, so the channel index is the
/// event's identity within a registry. The firing frame is not part of the
/// marker: trigger frames are session state tracked by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// The pyro channel the event is attached to
    pub channel: u32,
    /// Pitch angle of the device at firing, in degrees (-90..=90 by the
    /// authoring UI's convention; not enforced here)
    pub pitch: i32,
    /// Yaw angle of the device at firing, in degrees (-180..=180)
    pub yaw: i32,
    /// Roll angle of the device at firing, in degrees (-180..=180)
    pub roll: i32,
    /// The payload fired by the event
    pub payload: Payload,
}

impl Marker {
    /// Create a marker with zeroed orientation
    pub fn new(channel: u32, payload: Payload) -> Self {
        Self {
            channel,
            pitch: 0,
            yaw: 0,
            roll: 0,
            payload,
        }
    }

    /// Set the device orientation at firing
    pub fn with_orientation(mut self, pitch: i32, yaw: i32, roll: i32) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self.roll = roll;
        self
    }

    /// Parse a marker from a loosely-typed JSON record.
    ///
    /// `channel` and `payload` are required; the orientation angles default
    /// to 0 when absent. Numeric fields tolerate JSON strings and fractional
    /// numbers and are coerced to integers, as legacy persisted records
    /// expect.
    pub fn from_record(record: &Value) -> Result<Self> {
        let payload = record
            .get("payload")
            .ok_or(MarkerError::MissingField("payload"))?;
        let channel = record
            .get("channel")
            .ok_or(MarkerError::MissingField("channel"))?;

        Ok(Self {
            channel: coerce_channel(channel)?,
            pitch: angle_or_zero(record, "pitch")?,
            yaw: angle_or_zero(record, "yaw")?,
            roll: angle_or_zero(record, "roll")?,
            payload: payload_from_record(payload)?,
        })
    }
}

fn coerce_channel(value: &Value) -> Result<u32> {
    let raw = coerce_int(value, "channel")?;
    u32::try_from(raw).map_err(|_| MarkerError::InvalidNumber {
        field: "channel",
        value: raw.to_string(),
    })
}

fn angle_or_zero(record: &Value, field: &'static str) -> Result<i32> {
    match record.get(field) {
        Some(value) => Ok(coerce_int(value, field)? as i32),
        None => Ok(0),
    }
}

/// Coerce a JSON value to an integer: numbers are truncated, strings parsed.
fn coerce_int(value: &Value, field: &'static str) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| invalid(field, value)),
        Value::String(s) => s.trim().parse().map_err(|_| invalid(field, value)),
        _ => Err(invalid(field, value)),
    }
}

fn payload_from_record(record: &Value) -> Result<Payload> {
    let name = match record.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => return Err(MarkerError::MissingField("name")),
    };

    Ok(Payload {
        name,
        duration: float_or(record, "duration", DEFAULT_DURATION)?,
        prefire_time: float_or(record, "prefire_time", 0.0)?,
    })
}

fn float_or(record: &Value, field: &'static str, default: f64) -> Result<f64> {
    match record.get(field) {
        Some(value) => coerce_float(value, field),
        None => Ok(default),
    }
}

fn coerce_float(value: &Value, field: &'static str) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(field, value)),
        Value::String(s) => s.trim().parse().map_err(|_| invalid(field, value)),
        _ => Err(invalid(field, value)),
    }
}

fn invalid(field: &'static str, value: &Value) -> MarkerError {
    MarkerError::InvalidNumber {
        field,
        value: value.to_string(),
    }
}
