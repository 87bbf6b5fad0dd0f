//! IGES file reader

mod line_reader;
mod section_reader;

pub use line_reader::LineReader;

use section_reader::SectionReader;

use crate::assembly::DEFAULT_JOIN_TOLERANCE;
use crate::document::IgesDocument;
use crate::entities::spline::DEFAULT_LENGTH_SAMPLES;
use crate::error::Result;
use crate::io::iges::record::Record;
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Configuration for the IGES reader.
#[derive(Debug, Clone)]
pub struct IgesReaderConfiguration {
    /// Distance under which composite members are considered joined.
    ///
    /// Default: `1e-5`.
    pub join_tolerance: f64,
    /// When `true`, parameter records are buffered and decoded into their
    /// entities on the rayon thread pool once every record has been read.
    ///
    /// Default: `false`.
    pub parallel_parameters: bool,
    /// Polyline segments used to approximate B-spline curve length.
    ///
    /// Default: `64`.
    pub length_samples: usize,
    /// When `true`, an entity whose parameters cannot be decoded is reported
    /// as a notification and left with default geometry instead of aborting
    /// the read.
    ///
    /// Default: `false` (strict mode, errors propagate).
    pub failsafe: bool,
}

impl Default for IgesReaderConfiguration {
    fn default() -> Self {
        Self {
            join_tolerance: DEFAULT_JOIN_TOLERANCE,
            parallel_parameters: false,
            length_samples: DEFAULT_LENGTH_SAMPLES,
            failsafe: false,
        }
    }
}

/// IGES file reader
pub struct IgesReader<R: BufRead> {
    lines: LineReader<R>,
    config: IgesReaderConfiguration,
}

impl IgesReader<BufReader<File>> {
    /// Create a new IGES reader from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<'a> IgesReader<&'a [u8]> {
    /// Create a new IGES reader over in-memory text
    pub fn from_text(text: &'a str) -> Self {
        Self::from_reader(text.as_bytes())
    }
}

impl<R: BufRead> IgesReader<R> {
    /// Create a new IGES reader from any buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
            config: IgesReaderConfiguration::default(),
        }
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: IgesReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Fallback encoding for lines that are not valid UTF-8
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.lines = self.lines.with_encoding(encoding);
        self
    }

    /// Read the file and return a resolved IgesDocument
    pub fn read(mut self) -> Result<IgesDocument> {
        let mut sections = SectionReader::new(&self.config);
        while let Some(line) = self.lines.next_line()? {
            let record = Record::parse(self.lines.line_number(), &line)?;
            sections.consume(record)?;
        }

        let mut document = sections.finish()?;
        document.resolve_references(&self.config)?;
        Ok(document)
    }
}
