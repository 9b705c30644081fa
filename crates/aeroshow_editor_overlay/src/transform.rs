// SPDX-License-Identifier: MIT OR Apache-2.0
//! Orientation math for pyro direction indicators.

/// Rotate `v` around `axis` by `angle` radians.
///
/// Axis-angle rotation through the quaternion-derived rotation matrix; the
/// axis does not need to be normalized.
pub fn rotate(v: [f32; 3], axis: [f32; 3], angle: f32) -> [f32; 3] {
    let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    let axis = [axis[0] / len, axis[1] / len, axis[2] / len];

    let a = (angle / 2.0).cos();
    let s = (angle / 2.0).sin();
    let (b, c, d) = (-axis[0] * s, -axis[1] * s, -axis[2] * s);

    let (aa, bb, cc, dd) = (a * a, b * b, c * c, d * d);
    let (bc, ad, ac, ab, bd, cd) = (b * c, a * d, a * c, a * b, b * d, c * d);

    let m = [
        [aa + bb - cc - dd, 2.0 * (bc + ad), 2.0 * (bd - ac)],
        [2.0 * (bc - ad), aa + cc - bb - dd, 2.0 * (cd + ab)],
        [2.0 * (bd + ac), 2.0 * (cd - ab), aa + dd - bb - cc],
    ];

    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Compute the direction and yaw indicator points for a pyro marker.
///
/// Starts from the canonical "up" `(0, 0, 1)` and "forward" `(0, 1, 0)`
/// vectors and applies, in this order: roll around Z, pitch around Y, then
/// negated yaw around Z. The rotated vectors are anchored at the drone
/// position. The axis order and yaw sign match what the deployed shows were
/// authored against; do not swap them for a generic Euler convention.
pub fn compute_direction_indicators(
    pitch_deg: f32,
    yaw_deg: f32,
    roll_deg: f32,
    position: [f32; 3],
) -> ([f32; 3], [f32; 3]) {
    const Z_AXIS: [f32; 3] = [0.0, 0.0, 1.0];
    const Y_AXIS: [f32; 3] = [0.0, 1.0, 0.0];

    let pitch = pitch_deg.to_radians();
    let yaw = yaw_deg.to_radians();
    let roll = roll_deg.to_radians();

    let mut direction = [0.0, 0.0, 1.0];
    let mut yaw_indicator = [0.0, 1.0, 0.0];

    direction = rotate(direction, Z_AXIS, roll);
    yaw_indicator = rotate(yaw_indicator, Z_AXIS, roll);

    direction = rotate(direction, Y_AXIS, pitch);
    yaw_indicator = rotate(yaw_indicator, Y_AXIS, pitch);

    direction = rotate(direction, Z_AXIS, -yaw);
    yaw_indicator = rotate(yaw_indicator, Z_AXIS, -yaw);

    (add(position, direction), add(position, yaw_indicator))
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}
