//! Directory entry data shared by all entities
//!
//! Each entity has a two-line directory entry: nine 8-column fields per line
//! plus the sequence number of the first line, which is the entity's
//! identity for every pointer in the file.

use crate::error::{IgesError, Result};
use crate::io::iges::record::Record;
use std::fmt;

/// Decoded status number (directory field 9)
///
/// The eight digits pack four two-digit flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusNumber {
    /// 0 visible, 1 blanked
    pub blank_status: u8,
    /// 0 independent, 1 physically dependent, 2 logically dependent, 3 both
    pub subordinate: u8,
    /// 0 geometry, 1 annotation, 2 definition, ...
    pub entity_use: u8,
    /// 0 global top-down, 1 global defer, 2 use hierarchy property
    pub hierarchy: u8,
}

impl StatusNumber {
    /// Decode the raw field text; blank digits count as zero
    pub fn parse(field: &str, line: usize) -> Result<Self> {
        let raw = field.trim();
        if !raw.chars().all(|c| c.is_ascii_digit()) || raw.len() > 8 {
            return Err(IgesError::malformed(
                line,
                format!("status number '{}' is not an 8-digit field", raw),
            ));
        }
        let digits = format!("{:0>8}", raw);
        let pair = |i: usize| digits[i..i + 2].parse::<u8>().unwrap_or(0);
        Ok(Self {
            blank_status: pair(0),
            subordinate: pair(2),
            entity_use: pair(4),
            hierarchy: pair(6),
        })
    }

    pub fn is_blanked(&self) -> bool {
        self.blank_status == 1
    }

    /// Whether another entity owns this one
    pub fn is_dependent(&self) -> bool {
        self.subordinate != 0
    }
}

impl fmt::Display for StatusNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}{:02}{:02}{:02}",
            self.blank_status, self.subordinate, self.entity_use, self.hierarchy
        )
    }
}

/// Both directory lines of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub entity_type: i32,
    /// First parameter line of the entity
    pub parameter_pointer: i32,
    pub structure: i32,
    pub line_font_pattern: i32,
    pub level: i32,
    pub view: i32,
    /// Directory pointer of the transformation matrix, 0 for none
    pub transform: i32,
    pub label_display: i32,
    pub status: StatusNumber,
    /// Sequence number of the first directory line
    pub sequence: u32,
    pub line_weight: i32,
    pub color: i32,
    pub parameter_line_count: i32,
    pub form: i32,
    pub label: String,
    pub subscript: i32,
    /// Arena index of the transformation matrix once resolved
    pub transform_index: Option<usize>,
}

impl DirectoryEntry {
    pub fn new(entity_type: i32) -> Self {
        Self {
            entity_type,
            parameter_pointer: 0,
            structure: 0,
            line_font_pattern: 0,
            level: 0,
            view: 0,
            transform: 0,
            label_display: 0,
            status: StatusNumber::default(),
            sequence: 0,
            line_weight: 0,
            color: 0,
            parameter_line_count: 0,
            form: 0,
            label: String::new(),
            subscript: 0,
            transform_index: None,
        }
    }

    /// Fill the fields of the first directory line
    pub fn read_first_line(&mut self, record: &Record) -> Result<()> {
        self.entity_type = record.int_field(0, "entity type")?;
        self.parameter_pointer = record.int_field(1, "parameter pointer")?;
        self.structure = record.int_field(2, "structure")?;
        self.line_font_pattern = record.int_field(3, "line font pattern")?;
        self.level = record.int_field(4, "level")?;
        self.view = record.int_field(5, "view")?;
        self.transform = record.int_field(6, "transformation matrix")?;
        self.label_display = record.int_field(7, "label display")?;
        self.status = StatusNumber::parse(record.field(8), record.line)?;
        self.sequence = record.require_sequence()?;
        Ok(())
    }

    /// Fill the fields of the second directory line
    pub fn read_second_line(&mut self, record: &Record) -> Result<()> {
        let sequence = record.require_sequence()?;
        if sequence != self.sequence + 1 {
            return Err(IgesError::malformed(
                record.line,
                format!(
                    "directory line {} does not continue entry {}",
                    sequence, self.sequence
                ),
            ));
        }
        self.line_weight = record.int_field(1, "line weight")?;
        self.color = record.int_field(2, "color")?;
        self.parameter_line_count = record.int_field(3, "parameter line count")?;
        self.form = record.int_field(4, "form")?;
        self.label = record.field(7).trim().to_string();
        self.subscript = record.int_field(8, "entity subscript")?;
        Ok(())
    }

    pub fn has_transform(&self) -> bool {
        self.transform > 0
    }
}

impl Default for DirectoryEntry {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DE {} type {} form {}", self.sequence, self.entity_type, self.form)?;
        if !self.label.is_empty() {
            write!(f, " '{}'", self.label)?;
        }
        Ok(())
    }
}
