//! I/O module for reading IGES files

pub mod iges;

pub use iges::{IgesReader, IgesReaderConfiguration};
