//! Circular arc entity (type 100)
//!
//! The arc lies in a plane parallel to XY at height `z`, and runs
//! counterclockwise from `start` to `end` about `center`. Equal start and
//! end points describe a full circle.

use super::curve::parameter_steps;
use super::{Curve, DirectoryEntry, Entity};
use crate::error::Result;
use crate::io::iges::parameters::ParameterList;
use crate::types::transform::{matrix_to_points, points_to_matrix};
use crate::types::{Transform, Vector2, Vector3};
use std::f64::consts::TAU;
use std::fmt;

/// A circular arc in its definition plane
#[derive(Debug, Clone)]
pub struct CircularArc {
    /// Directory entry data
    pub directory: DirectoryEntry,
    /// Height of the definition plane
    pub z: f64,
    pub center: Vector2,
    pub start: Vector2,
    pub end: Vector2,
    /// Traversed clockwise (start and end already swapped)
    pub reversed: bool,
    transform: Transform,
}

impl CircularArc {
    pub const TYPE_CODE: i32 = 100;

    pub fn new() -> Self {
        CircularArc {
            directory: DirectoryEntry::new(Self::TYPE_CODE),
            z: 0.0,
            center: Vector2::ZERO,
            start: Vector2::ZERO,
            end: Vector2::ZERO,
            reversed: false,
            transform: Transform::identity(),
        }
    }

    /// Arc from its defining points
    pub fn from_points(z: f64, center: Vector2, start: Vector2, end: Vector2) -> Self {
        CircularArc {
            z,
            center,
            start,
            end,
            ..Self::new()
        }
    }

    /// Distance from center to start point
    pub fn radius(&self) -> f64 {
        self.center.distance(&self.start)
    }

    /// Start and end angles, unwrapped so that moving from the first to the
    /// second follows the traversal direction
    pub fn thetas(&self) -> (f64, f64) {
        let theta1 = self.start.angle_from(&self.center);
        let mut theta2 = self.end.angle_from(&self.center);
        if self.reversed {
            while theta2 >= theta1 {
                theta2 -= TAU;
            }
        } else {
            while theta2 <= theta1 {
                theta2 += TAU;
            }
        }
        (theta1, theta2)
    }

    /// Angular extent, always positive
    pub fn sweep(&self) -> f64 {
        let (theta1, theta2) = self.thetas();
        (theta2 - theta1).abs()
    }

    pub fn is_full_circle(&self) -> bool {
        self.start == self.end
    }

    fn local_point(&self, t: f64) -> Vector3 {
        let (theta1, theta2) = self.thetas();
        let theta = theta1 + t * (theta2 - theta1);
        let r = self.radius();
        Vector3::new(
            self.center.x + r * theta.cos(),
            self.center.y + r * theta.sin(),
            self.z,
        )
    }

    fn model_radius(&self) -> f64 {
        let center = self.transform.apply(self.center.with_z(self.z));
        let start = self.transform.apply(self.start.with_z(self.z));
        center.distance(&start)
    }
}

impl Default for CircularArc {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for CircularArc {
    fn directory(&self) -> &DirectoryEntry {
        &self.directory
    }

    fn directory_mut(&mut self) -> &mut DirectoryEntry {
        &mut self.directory
    }

    fn entity_name(&self) -> &'static str {
        "CircularArc"
    }

    fn load_parameters(&mut self, params: &ParameterList) -> Result<()> {
        let real = |i| params.real(i, "CircularArc");
        self.z = real(1)?;
        self.center = Vector2::new(real(2)?, real(3)?);
        self.start = Vector2::new(real(4)?, real(5)?);
        self.end = Vector2::new(real(6)?, real(7)?);
        Ok(())
    }
}

impl Curve for CircularArc {
    fn endpoints(&self) -> (Vector3, Vector3) {
        (
            self.transform.apply(self.start.with_z(self.z)),
            self.transform.apply(self.end.with_z(self.z)),
        )
    }

    fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
        self.reversed = !self.reversed;
    }

    fn length(&self) -> f64 {
        self.model_radius() * self.sweep()
    }

    fn point_at(&self, t: f64) -> Vector3 {
        self.transform.apply(self.local_point(t))
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn linspace(&self, n: usize, endpoint: bool) -> Vec<Vector3> {
        let local: Vec<Vector3> = parameter_steps(n, endpoint)
            .into_iter()
            .map(|t| self.local_point(t))
            .collect();
        matrix_to_points(&self.transform.apply_batch(&points_to_matrix(&local)))
    }
}

impl fmt::Display for CircularArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CircularArc center {} z {} from {} to {}{}",
            self.center,
            self.z,
            self.start,
            self.end,
            if self.reversed { " (reversed)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-12;

    fn quarter() -> CircularArc {
        CircularArc::from_points(
            0.0,
            Vector2::ZERO,
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        )
    }

    #[test]
    fn test_load_parameters() {
        let mut arc = CircularArc::new();
        let params = ParameterList::parse(3, "100,2.,0.,0.,1.,0.,0.,1.", ',');
        arc.load_parameters(&params).unwrap();
        assert_eq!(arc.z, 2.0);
        assert_eq!(arc.start, Vector2::new(1.0, 0.0));
        assert_eq!(arc.end, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_quarter_arc_measurements() {
        let arc = quarter();
        assert!((arc.radius() - 1.0).abs() < EPS);
        let (t1, t2) = arc.thetas();
        assert!(t1.abs() < EPS);
        assert!((t2 - FRAC_PI_2).abs() < EPS);
        assert!((arc.length() - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_end_angle_unwraps_past_start() {
        let arc = CircularArc::from_points(
            0.0,
            Vector2::ZERO,
            Vector2::new(0.0, 1.0),
            Vector2::new(1.0, 0.0),
        );
        let (t1, t2) = arc.thetas();
        assert!(t2 > t1);
        assert!((arc.sweep() - 1.5 * PI).abs() < EPS);
    }

    #[test]
    fn test_full_circle() {
        let p = Vector2::new(2.0, 0.0);
        let arc = CircularArc::from_points(0.0, Vector2::ZERO, p, p);
        assert!(arc.is_full_circle());
        assert!((arc.length() - 2.0 * TAU).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_keeps_locus() {
        let mut arc = quarter();
        let forward = arc.linspace(5, true);
        arc.reverse();
        let (t1, t2) = arc.thetas();
        assert!(t2 < t1);
        assert!((arc.length() - FRAC_PI_2).abs() < EPS);
        let backward = arc.linspace(5, true);
        for (a, b) in forward.iter().zip(backward.iter().rev()) {
            assert!(a.distance(b) < 1e-9);
        }
    }

    #[test]
    fn test_samples_lie_on_circle() {
        let arc = quarter();
        for p in arc.linspace(7, true) {
            assert!((p.length() - 1.0).abs() < 1e-9);
        }
        let pts = arc.linspace(2, true);
        assert!(pts[1].distance(&Vector3::new(0.0, 1.0, 0.0)) < 1e-9);
    }
}
