//! Line entity (type 110)

use super::{Curve, DirectoryEntry, Entity};
use crate::error::Result;
use crate::io::iges::parameters::ParameterList;
use crate::types::transform::{matrix_to_points, points_to_matrix};
use crate::types::{Transform, Vector3};
use std::fmt;

/// A line segment defined by two endpoints
#[derive(Debug, Clone)]
pub struct Line {
    /// Directory entry data
    pub directory: DirectoryEntry,
    /// Start point in definition space
    pub start: Vector3,
    /// End point in definition space
    pub end: Vector3,
    transform: Transform,
}

impl Line {
    pub const TYPE_CODE: i32 = 110;

    /// Create a degenerate line at the origin
    pub fn new() -> Self {
        Line {
            directory: DirectoryEntry::new(Self::TYPE_CODE),
            start: Vector3::ZERO,
            end: Vector3::ZERO,
            transform: Transform::identity(),
        }
    }

    /// Create a new line between two points
    pub fn from_points(start: Vector3, end: Vector3) -> Self {
        Line {
            start,
            end,
            ..Self::new()
        }
    }

    /// Unit direction from start to end in model space
    pub fn direction(&self) -> Vector3 {
        let (start, end) = self.endpoints();
        (end - start).normalize()
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Line {
    fn directory(&self) -> &DirectoryEntry {
        &self.directory
    }

    fn directory_mut(&mut self) -> &mut DirectoryEntry {
        &mut self.directory
    }

    fn entity_name(&self) -> &'static str {
        "Line"
    }

    fn load_parameters(&mut self, params: &ParameterList) -> Result<()> {
        self.start = params.point(1, "Line")?;
        self.end = params.point(4, "Line")?;
        Ok(())
    }
}

impl Curve for Line {
    fn endpoints(&self) -> (Vector3, Vector3) {
        (self.transform.apply(self.start), self.transform.apply(self.end))
    }

    fn reverse(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }

    fn length(&self) -> f64 {
        let (start, end) = self.endpoints();
        start.distance(&end)
    }

    fn point_at(&self, t: f64) -> Vector3 {
        self.transform.apply(self.start.lerp(&self.end, t))
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn linspace(&self, n: usize, endpoint: bool) -> Vec<Vector3> {
        let local: Vec<Vector3> = super::curve::parameter_steps(n, endpoint)
            .into_iter()
            .map(|t| self.start.lerp(&self.end, t))
            .collect();
        matrix_to_points(&self.transform.apply_batch(&points_to_matrix(&local)))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.endpoints();
        write!(f, "Line {} -- {}", start, end)
    }
}
