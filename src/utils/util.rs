//! # Utility Module
//!
//! Numeric helpers shared by the snapping passes.
//!
//! ## Tolerance policy
//!
//! Distances are rounded to the nearest integer before being compared with the
//! tolerance, and the comparison is inclusive.

use crate::utils::geometry::Point;

/// Returns `true` when `distance` counts as a hit for `tolerance`.
///
/// # Examples
///
/// ```
/// use rust_snap::utils::util::within_tolerance;
///
/// assert!(within_tolerance(5.0, 5.0));
/// assert!(within_tolerance(5.4, 5.0));
/// assert!(!within_tolerance(6.0, 5.0));
/// ```
pub fn within_tolerance(distance: f64, tolerance: f64) -> bool {
    distance.abs().round() <= tolerance
}

/// Exact-equality key for a point. `-0.0` and `0.0` map to the same key.
pub fn point_key(point: &Point) -> (u64, u64) {
    (coord_key(point.x), coord_key(point.y))
}

/// Exact-equality key for one coordinate.
pub fn coord_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        assert!(within_tolerance(5.0, 5.0));
        assert!(!within_tolerance(6.0, 5.0));
    }

    #[test]
    fn test_tolerance_rounds_before_comparing() {
        // Rounds down onto the boundary.
        assert!(within_tolerance(5.49, 5.0));
        // Rounds up past it.
        assert!(!within_tolerance(5.5, 5.0));
        assert!(within_tolerance(-3.0, 5.0));
    }

    #[test]
    fn test_signed_zero_shares_a_key() {
        assert_eq!(coord_key(-0.0), coord_key(0.0));
        assert_ne!(coord_key(1.0), coord_key(1.0000001));
        assert_eq!(point_key(&Point::new(-0.0, 2.0)), point_key(&Point::new(0.0, 2.0)));
    }
}
