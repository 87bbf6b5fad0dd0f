//! Transformation matrix entity (type 124)

use super::{DirectoryEntry, Entity};
use crate::error::Result;
use crate::io::iges::parameters::ParameterList;
use crate::types::{Transform, Vector3};
use std::fmt;

/// Rotation/scale matrix and translation applied to referencing entities
///
/// Parameters 1-12 are the rows `R11 R12 R13 T1`, `R21 R22 R23 T2`,
/// `R31 R32 R33 T3`. A matrix may itself reference another matrix through
/// its directory entry; the document composes such chains.
#[derive(Debug, Clone)]
pub struct TransformationMatrix {
    /// Directory entry data
    pub directory: DirectoryEntry,
    /// This entity's own `R` and `T`
    pub matrix: Transform,
}

impl TransformationMatrix {
    pub const TYPE_CODE: i32 = 124;

    pub fn new() -> Self {
        TransformationMatrix {
            directory: DirectoryEntry::new(Self::TYPE_CODE),
            matrix: Transform::identity(),
        }
    }

    pub fn from_transform(matrix: Transform) -> Self {
        TransformationMatrix {
            matrix,
            ..Self::new()
        }
    }

    /// Apply this matrix alone to a point
    pub fn apply(&self, point: Vector3) -> Vector3 {
        self.matrix.apply(point)
    }
}

impl Default for TransformationMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for TransformationMatrix {
    fn directory(&self) -> &DirectoryEntry {
        &self.directory
    }

    fn directory_mut(&mut self) -> &mut DirectoryEntry {
        &mut self.directory
    }

    fn entity_name(&self) -> &'static str {
        "TransformationMatrix"
    }

    fn load_parameters(&mut self, params: &ParameterList) -> Result<()> {
        let v = params.reals(1..13, "TransformationMatrix")?;
        self.matrix = Transform::from_rows(
            [v[0], v[1], v[2]],
            [v[4], v[5], v[6]],
            [v[8], v[9], v[10]],
            [v[3], v[7], v[11]],
        );
        Ok(())
    }
}

impl fmt::Display for TransformationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransformationMatrix {}", self.matrix)
    }
}
