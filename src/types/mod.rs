//! Core value types: vectors and transforms

pub mod transform;
pub mod vector;

pub use transform::Transform;
pub use vector::{Vector2, Vector3};
