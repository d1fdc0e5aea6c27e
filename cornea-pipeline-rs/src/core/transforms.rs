//! Coordinate math shared by the transformer stages.

use std::f64::consts::TAU;

/// Angle of a meridian in radians.
///
/// With `meridians` evenly spaced meridians numbered from zero, segment `k`
/// sits at `k / meridians * 2π`.
///
/// # Example
///
/// ```
/// use cornea_pipeline::core::transforms::segment_angle;
///
/// let angle = segment_angle(1, 4);
/// assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
#[inline]
pub fn segment_angle(segment: u32, meridians: u64) -> f64 {
    debug_assert!(meridians > 0, "meridian count must be positive");
    (segment as f64 / meridians as f64) * TAU
}

/// Convert a polar (radius, angle) pair to cartesian (x, y).
#[inline]
pub fn polar_to_cartesian(radius: f64, angle_rad: f64) -> (f64, f64) {
    let (sin_a, cos_a) = angle_rad.sin_cos();
    (radius * cos_a, radius * sin_a)
}
