//! IGES entity types and traits

pub mod arc;
pub mod associativity;
pub mod composite_curve;
pub mod curve;
pub mod directory;
pub mod entity_code;
pub mod line;
pub mod placeholder;
pub mod spline;
pub mod transformation_matrix;

pub use arc::CircularArc;
pub use associativity::{AssociativityInstance, ORDERED_GROUP_FORM};
pub use composite_curve::{CompositeCurve, CurveChain};
pub use curve::{Curve, CurveRef};
pub use directory::{DirectoryEntry, StatusNumber};
pub use entity_code::{create_entity, entity_type_name};
pub use line::Line;
pub use placeholder::Placeholder;
pub use spline::{BSplineProperties, RationalBSplineCurve};
pub use transformation_matrix::TransformationMatrix;

use crate::error::Result;
use crate::io::iges::parameters::ParameterList;
use std::fmt;

/// Base trait for all IGES entities
pub trait Entity {
    /// Directory entry data
    fn directory(&self) -> &DirectoryEntry;

    /// Mutable directory entry data
    fn directory_mut(&mut self) -> &mut DirectoryEntry;

    /// Entity type name
    fn entity_name(&self) -> &'static str;

    /// Fill the entity from its parameter record
    fn load_parameters(&mut self, params: &ParameterList) -> Result<()>;

    /// Sequence number of the first directory line
    fn sequence(&self) -> u32 {
        self.directory().sequence
    }

    fn form(&self) -> i32 {
        self.directory().form
    }
}

/// Enumeration of all entity types for type-safe storage
#[derive(Debug, Clone)]
pub enum EntityType {
    /// Circular arc (100)
    CircularArc(CircularArc),
    /// Composite curve (102)
    CompositeCurve(CompositeCurve),
    /// Line (110)
    Line(Line),
    /// Transformation matrix (124)
    TransformationMatrix(TransformationMatrix),
    /// Rational B-spline curve (126)
    RationalBSplineCurve(RationalBSplineCurve),
    /// Associativity instance (402)
    AssociativityInstance(AssociativityInstance),
    /// Any type without a reader
    Placeholder(Placeholder),
}

impl EntityType {
    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::CircularArc(e) => e,
            EntityType::CompositeCurve(e) => e,
            EntityType::Line(e) => e,
            EntityType::TransformationMatrix(e) => e,
            EntityType::RationalBSplineCurve(e) => e,
            EntityType::AssociativityInstance(e) => e,
            EntityType::Placeholder(e) => e,
        }
    }

    /// Get a mutable reference to the entity trait object
    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            EntityType::CircularArc(e) => e,
            EntityType::CompositeCurve(e) => e,
            EntityType::Line(e) => e,
            EntityType::TransformationMatrix(e) => e,
            EntityType::RationalBSplineCurve(e) => e,
            EntityType::AssociativityInstance(e) => e,
            EntityType::Placeholder(e) => e,
        }
    }

    /// Leaf curve view, for entities with their own geometry
    pub fn as_curve(&self) -> Option<&dyn Curve> {
        match self {
            EntityType::CircularArc(e) => Some(e),
            EntityType::Line(e) => Some(e),
            EntityType::RationalBSplineCurve(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_curve_mut(&mut self) -> Option<&mut dyn Curve> {
        match self {
            EntityType::CircularArc(e) => Some(e),
            EntityType::Line(e) => Some(e),
            EntityType::RationalBSplineCurve(e) => Some(e),
            _ => None,
        }
    }

    /// Child list of a composite curve or ordered group
    pub fn as_chain(&self) -> Option<&CurveChain> {
        match self {
            EntityType::CompositeCurve(e) => Some(&e.chain),
            EntityType::AssociativityInstance(e) if e.is_ordered_group() => Some(&e.chain),
            _ => None,
        }
    }

    pub fn as_chain_mut(&mut self) -> Option<&mut CurveChain> {
        match self {
            EntityType::CompositeCurve(e) => Some(&mut e.chain),
            EntityType::AssociativityInstance(e) if e.is_ordered_group() => Some(&mut e.chain),
            _ => None,
        }
    }

    /// Directory entry data
    pub fn directory(&self) -> &DirectoryEntry {
        self.as_entity().directory()
    }

    pub fn directory_mut(&mut self) -> &mut DirectoryEntry {
        self.as_entity_mut().directory_mut()
    }

    pub fn sequence(&self) -> u32 {
        self.directory().sequence
    }

    /// Whether the entity is a curve or a chain of curves
    pub fn is_curve(&self) -> bool {
        self.as_curve().is_some() || self.as_chain().is_some()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::CircularArc(e) => fmt::Display::fmt(e, f),
            EntityType::CompositeCurve(e) => fmt::Display::fmt(e, f),
            EntityType::Line(e) => fmt::Display::fmt(e, f),
            EntityType::TransformationMatrix(e) => fmt::Display::fmt(e, f),
            EntityType::RationalBSplineCurve(e) => fmt::Display::fmt(e, f),
            EntityType::AssociativityInstance(e) => fmt::Display::fmt(e, f),
            EntityType::Placeholder(e) => fmt::Display::fmt(e, f),
        }
    }
}
