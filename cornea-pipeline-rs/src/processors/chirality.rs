//! Handedness correction for exported depth values.
//!
//! Keratograph exports store depth as an unsigned magnitude. Read directly as
//! a right-handed z axis pointing at the observer, the concave posterior
//! surface bulges toward the viewer and the eye appears mirrored. Negating z
//! restores the physical orientation. Whether to apply it is a property of
//! the device/export convention and is passed in by the caller.

use crate::core::loaders::{CartesianPoint, CorrectedPoint};

/// Correct a single point. Only z is touched.
#[inline]
pub fn correct_point(point: &CartesianPoint, needs_correction: bool) -> CorrectedPoint {
    let z = if needs_correction { -point.z } else { point.z };
    CorrectedPoint::new(point.x, point.y, z)
}

/// Correct every point, keeping order.
pub fn correct_chirality(points: &[CartesianPoint], needs_correction: bool) -> Vec<CorrectedPoint> {
    points
        .iter()
        .map(|p| correct_point(p, needs_correction))
        .collect()
}
