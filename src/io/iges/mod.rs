//! IGES (Initial Graphics Exchange Specification) reading
//!
//! An IGES file is a sequence of 80-column records in five sections: Start,
//! Global, Directory, Parameter and Terminate. The reader splits records,
//! decodes the Global delimiters, builds one entity per directory entry,
//! fills it from its parameter record, and finally resolves pointers
//! between entities.

pub mod global;
pub mod parameters;
pub mod reader;
pub mod record;

pub use global::{Delimiters, GlobalSection, GlobalSectionParser, Units};
pub use parameters::ParameterList;
pub use reader::{IgesReader, IgesReaderConfiguration, LineReader};
pub use record::{Record, SectionCode};

use crate::document::IgesDocument;
use crate::error::Result;
use std::path::Path;

/// Read and resolve an IGES file with the default configuration
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<IgesDocument> {
    IgesReader::from_file(path)?.read()
}

/// Read and resolve IGES text with the default configuration
pub fn read_text(text: &str) -> Result<IgesDocument> {
    IgesReader::from_text(text).read()
}
