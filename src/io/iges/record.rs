//! Fixed-width physical records
//!
//! Every IGES line is 80 columns. Column 73 holds the section code and
//! columns 74-80 the line's sequence number within its section. Directory
//! lines are further cut into nine 8-column fields; parameter lines carry 64
//! columns of free-format data followed by the owning entity's directory
//! pointer in columns 65-72.

use crate::error::{IgesError, Result};
use std::fmt;
use std::ops::Range;

/// Width of a physical record
pub const RECORD_WIDTH: usize = 80;
/// Zero-based column of the section code (column 73)
pub const SECTION_COLUMN: usize = 72;
/// Width of a directory entry field
pub const FIELD_WIDTH: usize = 8;
/// Columns of a parameter line that carry data
pub const PARAMETER_DATA_WIDTH: usize = 64;

/// Section a physical record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionCode {
    /// `S`: free-form prologue
    Start,
    /// `G`: delimiters and file-level metadata
    Global,
    /// `D`: two lines of metadata per entity
    Directory,
    /// `P`: free-format entity parameters
    Parameter,
    /// `T`: section line counts
    Terminate,
}

impl SectionCode {
    /// Map a column-73 character to its section
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(Self::Start),
            'G' => Some(Self::Global),
            'D' => Some(Self::Directory),
            'P' => Some(Self::Parameter),
            'T' => Some(Self::Terminate),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::Start => 'S',
            Self::Global => 'G',
            Self::Directory => 'D',
            Self::Parameter => 'P',
            Self::Terminate => 'T',
        }
    }
}

impl fmt::Display for SectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One physical line split by its section sentinel
#[derive(Debug, Clone)]
pub struct Record {
    /// One-based physical line number in the file
    pub line: usize,
    /// Section code from column 73
    pub section: SectionCode,
    /// Sequence number from columns 74-80, if it parses
    pub sequence: Option<u32>,
    text: String,
}

impl Record {
    /// Split a physical line
    ///
    /// Lines shorter than 80 columns are padded with blanks; anything past
    /// column 80 is dropped. A missing or unknown section code is a
    /// `MalformedRecord`.
    pub fn parse(line: usize, raw: &str) -> Result<Self> {
        let mut text: String = raw.chars().take(RECORD_WIDTH).collect();
        let width = text.chars().count();
        if width <= SECTION_COLUMN {
            return Err(IgesError::malformed(
                line,
                format!("record is {} columns wide, section code missing", width),
            ));
        }
        text.extend(std::iter::repeat(' ').take(RECORD_WIDTH - width));

        let code = text.chars().nth(SECTION_COLUMN).unwrap_or(' ');
        let section = SectionCode::from_char(code).ok_or_else(|| {
            IgesError::malformed(line, format!("unexpected section code '{}'", code))
        })?;

        let mut record = Self {
            line,
            section,
            sequence: None,
            text,
        };
        record.sequence = record.columns(SECTION_COLUMN + 1..RECORD_WIDTH).trim().parse().ok();
        Ok(record)
    }

    /// Text of a zero-based column range
    pub fn columns(&self, range: Range<usize>) -> &str {
        let start = self.byte_offset(range.start);
        let end = self.byte_offset(range.end);
        &self.text[start..end]
    }

    fn byte_offset(&self, column: usize) -> usize {
        if self.text.is_ascii() {
            return column.min(self.text.len());
        }
        self.text
            .char_indices()
            .nth(column)
            .map_or(self.text.len(), |(i, _)| i)
    }

    /// Columns 1-72
    pub fn data(&self) -> &str {
        self.columns(0..SECTION_COLUMN)
    }

    /// One of the nine 8-column directory fields (zero-based)
    pub fn field(&self, index: usize) -> &str {
        let start = index * FIELD_WIDTH;
        self.columns(start..start + FIELD_WIDTH)
    }

    /// Directory field as an integer; blank fields default to 0
    pub fn int_field(&self, index: usize, name: &str) -> Result<i32> {
        let raw = self.field(index).trim();
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse().map_err(|_| {
            IgesError::malformed(self.line, format!("{} field '{}' is not an integer", name, raw))
        })
    }

    /// Sequence number, required for directory records
    pub fn require_sequence(&self) -> Result<u32> {
        self.sequence.ok_or_else(|| {
            IgesError::malformed(
                self.line,
                format!("invalid sequence number '{}'", self.columns(SECTION_COLUMN + 1..RECORD_WIDTH).trim()),
            )
        })
    }

    /// Columns 1-64 of a parameter line
    pub fn parameter_data(&self) -> &str {
        self.columns(0..PARAMETER_DATA_WIDTH)
    }

    /// Directory pointer in columns 65-72 of a parameter line
    pub fn back_pointer(&self) -> Result<u32> {
        self.optional_back_pointer()?.ok_or_else(|| {
            IgesError::malformed(self.line, "parameter record has no back pointer")
        })
    }

    /// Directory pointer of a continuation line, which may be left blank
    pub fn optional_back_pointer(&self) -> Result<Option<u32>> {
        let raw = self.columns(PARAMETER_DATA_WIDTH..SECTION_COLUMN).trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(|_| {
            IgesError::malformed(self.line, format!("invalid parameter back pointer '{}'", raw))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(body: &str, code: char, seq: u32) -> String {
        format!("{:<72}{}{:>7}", body, code, seq)
    }

    #[test]
    fn test_section_codes() {
        for c in ['S', 'G', 'D', 'P', 'T'] {
            let rec = Record::parse(1, &line("", c, 1)).unwrap();
            assert_eq!(rec.section.as_char(), c);
        }
    }

    #[test]
    fn test_unknown_section_is_malformed() {
        let err = Record::parse(4, &line("", 'X', 1)).unwrap_err();
        assert!(matches!(err, IgesError::MalformedRecord { line: 4, .. }));
    }

    #[test]
    fn test_short_line_is_malformed() {
        assert!(Record::parse(1, "110,0.0;").is_err());
    }

    #[test]
    fn test_sequence_and_fields() {
        let text = line("     110       1       0       1       0       0       0       0       0", 'D', 17);
        let rec = Record::parse(3, &text).unwrap();
        assert_eq!(rec.sequence, Some(17));
        assert_eq!(rec.int_field(0, "entity type").unwrap(), 110);
        assert_eq!(rec.int_field(1, "parameter pointer").unwrap(), 1);
    }

    #[test]
    fn test_missing_sequence_columns_are_padded() {
        let text = format!("{:<72}G", "1H,,1H;");
        let rec = Record::parse(1, &text).unwrap();
        assert_eq!(rec.section, SectionCode::Global);
        assert_eq!(rec.sequence, None);
        assert!(rec.require_sequence().is_err());
    }

    #[test]
    fn test_parameter_columns() {
        let text = format!("{:<64}{:>8}P{:>7}", "110,0.,0.,0.,1.,0.,0.;", 7, 1);
        let rec = Record::parse(10, &text).unwrap();
        assert_eq!(rec.back_pointer().unwrap(), 7);
        assert!(rec.parameter_data().starts_with("110,"));
        assert_eq!(rec.parameter_data().len(), 64);
    }

    #[test]
    fn test_blank_back_pointer_is_optional() {
        let blank = Record::parse(7, &format!("{:<72}P{:>7}", "10.,0.,0.;", 2)).unwrap();
        assert_eq!(blank.optional_back_pointer().unwrap(), None);
        assert!(matches!(
            blank.back_pointer(),
            Err(IgesError::MalformedRecord { line: 7, .. })
        ));

        let first = Record::parse(6, &format!("{:<64}{:>8}P{:>7}", "110,0.,", 1, 1)).unwrap();
        assert_eq!(first.optional_back_pointer().unwrap(), Some(1));
        assert_eq!(first.back_pointer().unwrap(), 1);
    }
}
