//! # igesrust
//!
//! A pure Rust library for reading curve geometry from IGES files.
//!
//! ## Features
//!
//! - Fixed-width record parsing with file-declared delimiters
//! - Lines, circular arcs, rational B-spline curves and transformation matrices
//! - Composite curves and ordered groups, stitched into oriented chains
//! - Sampling by count (`linspace`) or by spacing (`arange`)
//! - Non-fatal conditions reported as notifications on the document
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use igesrust::{Curve, IgesReader};
//!
//! let doc = IgesReader::from_file("part.igs")?.read()?;
//!
//! for curve in doc.curves() {
//!     let points = curve.arange(0.5, true);
//!     println!("{} points, length {}", points.len(), curve.length());
//! }
//!
//! for note in &doc.notifications {
//!     println!("{}", note);
//! }
//! # Ok::<(), igesrust::error::IgesError>(())
//! ```
//!
//! ## Architecture
//!
//! - `Entity` - Trait for all entities (directory data and parameter loading)
//! - `Curve` - Trait for entities that can be sampled
//! - `IgesDocument` - Entity arena, pointer table and Global section
//! - `CompositeCurveAssembler` - Nearest-endpoint chain reconstruction

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod assembly;
pub mod document;
pub mod entities;
pub mod error;
pub mod io;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use error::{IgesError, Result};
pub use types::{Transform, Vector2, Vector3};

// Re-export entity types
pub use entities::{
    AssociativityInstance, CircularArc, CompositeCurve, Curve, CurveRef, DirectoryEntry, Entity,
    EntityType, Line, Placeholder, RationalBSplineCurve, TransformationMatrix,
};

// Re-export document
pub use assembly::CompositeCurveAssembler;
pub use document::IgesDocument;
pub use notification::{Notification, NotificationCollection, NotificationType};

// Re-export I/O types
pub use io::iges::{GlobalSection, IgesReader, IgesReaderConfiguration};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
