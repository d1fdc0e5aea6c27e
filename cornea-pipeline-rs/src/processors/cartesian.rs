//! Cylindrical to cartesian conversion for a full export.
//!
//! The meridian spacing depends on the highest segment index in the whole
//! record set, so conversion runs in two phases: collect the set and resolve
//! angles ([`assign_angles`]), then map each point ([`to_cartesian`]).

use thiserror::Error;

use crate::core::loaders::{AngularPoint, CartesianPoint, CylindricalPoint};
use crate::core::transforms::{polar_to_cartesian, segment_angle};

/// Errors that can occur during cartesian conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("no records to transform: cannot determine meridian count from an empty set")]
    EmptyInput,
}

/// Number of meridians implied by a record set, `max(segment) + 1`.
///
/// Segment indices are assumed to be zero-based and contiguous; gaps are
/// not detected.
pub fn meridian_count(points: &[CylindricalPoint]) -> Result<u64, TransformError> {
    points
        .iter()
        .map(|p| p.segment)
        .max()
        .map(|max_seg| u64::from(max_seg) + 1)
        .ok_or(TransformError::EmptyInput)
}

/// Resolve the meridian angle of every point.
///
/// `angle = segment / (max_segment + 1) * 2π`, so angles lie in `[0, 2π)`.
pub fn assign_angles(points: &[CylindricalPoint]) -> Result<Vec<AngularPoint>, TransformError> {
    let meridians = meridian_count(points)?;
    Ok(assign_angles_with(points, meridians))
}

/// Resolve angles against a meridian count already taken from the full set.
pub fn assign_angles_with(points: &[CylindricalPoint], meridians: u64) -> Vec<AngularPoint> {
    points
        .iter()
        .map(|p| AngularPoint::from_cylindrical(p, segment_angle(p.segment, meridians)))
        .collect()
}

/// Map angular points to cartesian space.
///
/// `x = r cos θ`, `y = r sin θ` and `z` is the stored depth, sign untouched.
pub fn to_cartesian(points: &[AngularPoint]) -> Vec<CartesianPoint> {
    points
        .iter()
        .map(|p| {
            let (x, y) = polar_to_cartesian(p.radial_distance, p.angle);
            CartesianPoint::new(x, y, p.depth)
        })
        .collect()
}

/// Convert a full record set, both phases.
pub fn transform(points: &[CylindricalPoint]) -> Result<Vec<CartesianPoint>, TransformError> {
    let angular = assign_angles(points)?;
    Ok(to_cartesian(&angular))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    const EPS: f64 = 1e-9;

    fn ring(meridians: u32, radius: f64, depth: f64) -> Vec<CylindricalPoint> {
        (0..meridians)
            .map(|seg| CylindricalPoint::new(seg, radius, depth))
            .collect()
    }

    #[test]
    fn test_meridian_count() {
        let points = vec![
            CylindricalPoint::new(3, 1.0, 0.0),
            CylindricalPoint::new(0, 1.0, 0.0),
            CylindricalPoint::new(255, 1.0, 0.0),
        ];
        assert_eq!(meridian_count(&points), Ok(256));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert_eq!(meridian_count(&[]), Err(TransformError::EmptyInput));
        assert_eq!(assign_angles(&[]), Err(TransformError::EmptyInput));
        assert_eq!(transform(&[]), Err(TransformError::EmptyInput));
    }

    #[test]
    fn test_angles_evenly_spaced_and_increasing() {
        let n = 256;
        let angular = assign_angles(&ring(n, 2.0, 0.1)).unwrap();

        for (k, p) in angular.iter().enumerate() {
            let expected = TAU * k as f64 / n as f64;
            assert!((p.angle - expected).abs() < EPS, "segment {k}");
            assert!(p.angle >= 0.0 && p.angle < TAU);
        }
        assert!(angular.windows(2).all(|w| w[0].angle < w[1].angle));
    }

    #[test]
    fn test_angle_depends_on_whole_set() {
        // The same record resolves differently depending on the set's max segment.
        let alone = assign_angles(&[CylindricalPoint::new(1, 1.0, 0.0)]).unwrap();
        assert!((alone[0].angle - PI).abs() < EPS);

        let with_more = assign_angles(&ring(4, 1.0, 0.0)).unwrap();
        assert!((with_more[1].angle - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_assign_angles_with_matches_assign_angles() {
        let points = ring(8, 1.0, 0.2);
        let meridians = meridian_count(&points).unwrap();
        assert_eq!(assign_angles_with(&points, meridians), assign_angles(&points).unwrap());
    }

    #[test]
    fn test_radius_preserved() {
        let points: Vec<CylindricalPoint> = (0..360)
            .map(|seg| CylindricalPoint::new(seg, 0.1 + seg as f64 * 0.013, 0.2))
            .collect();

        let cartesian = transform(&points).unwrap();
        assert_eq!(cartesian.len(), points.len());

        for (input, out) in points.iter().zip(&cartesian) {
            let r = (out.x * out.x + out.y * out.y).sqrt();
            assert!((r - input.radial_distance).abs() < EPS);
        }
    }

    #[test]
    fn test_two_meridian_example() {
        let points = vec![
            CylindricalPoint::new(0, 1.0, 2.0),
            CylindricalPoint::new(1, 1.0, 2.0),
        ];

        let angular = assign_angles(&points).unwrap();
        assert_eq!(angular[0].angle, 0.0);
        assert!((angular[1].angle - PI).abs() < EPS);

        let cartesian = to_cartesian(&angular);
        assert!((cartesian[0].x - 1.0).abs() < EPS);
        assert!(cartesian[0].y.abs() < EPS);
        assert_eq!(cartesian[0].z, 2.0);
        assert!((cartesian[1].x + 1.0).abs() < EPS);
        assert!(cartesian[1].y.abs() < EPS);
        assert_eq!(cartesian[1].z, 2.0);
    }

    #[test]
    fn test_depth_sign_passes_through() {
        let points = vec![
            CylindricalPoint::new(0, 1.0, -0.75),
            CylindricalPoint::new(1, 1.0, 0.75),
        ];
        let cartesian = transform(&points).unwrap();
        assert_eq!(cartesian[0].z, -0.75);
        assert_eq!(cartesian[1].z, 0.75);
    }

    #[test]
    fn test_order_follows_input() {
        let points = vec![
            CylindricalPoint::new(2, 1.0, 0.3),
            CylindricalPoint::new(0, 1.0, 0.1),
            CylindricalPoint::new(1, 1.0, 0.2),
        ];
        let cartesian = transform(&points).unwrap();
        let depths: Vec<f64> = cartesian.iter().map(|p| p.z).collect();
        assert_eq!(depths, vec![0.3, 0.1, 0.2]);
    }
}
