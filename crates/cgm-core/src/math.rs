//! Float helpers missing from `core`
//!
//! `f32::ceil` and `f32::round` live in `std`, so the few roundings the chart
//! needs are done here with truncating casts.

/// Magnitude from which every `f32` is already integral (2^23).
const INTEGRAL_F32: f32 = 8_388_608.0;

/// Smallest integral value greater than or equal to `x`.
pub(crate) fn ceil_f32(x: f32) -> f32 {
    if !(x.abs() < INTEGRAL_F32) {
        return x;
    }
    let truncated = x as i64 as f32;
    if truncated < x { truncated + 1.0 } else { truncated }
}

/// Largest integral value less than or equal to `x`.
pub(crate) fn floor_f32(x: f32) -> f32 {
    if !(x.abs() < INTEGRAL_F32) {
        return x;
    }
    let truncated = x as i64 as f32;
    if truncated > x { truncated - 1.0 } else { truncated }
}

/// Round half up, matching `Math.round` style rounding used for pixel snapping.
pub(crate) fn round_f32(x: f32) -> f32 {
    floor_f32(x + 0.5)
}

/// Snap a finite pixel coordinate to the nearest integer pixel.
pub(crate) fn round_to_i32(x: f32) -> i32 {
    round_f32(x) as i32
}
