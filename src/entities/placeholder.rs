//! Placeholder for entity types without a geometry reader.
//!
//! The directory entry is kept so pointers to the entity still resolve and
//! its metadata (level, color, label, status) stays available. Its parameter
//! record is accepted and dropped.

use super::entity_code::entity_type_name;
use super::{DirectoryEntry, Entity};
use crate::error::Result;
use crate::io::iges::parameters::ParameterList;
use std::fmt;

/// An entity whose type is not read by the library.
#[derive(Debug, Clone)]
pub struct Placeholder {
    /// Directory entry data.
    pub directory: DirectoryEntry,
}

impl Placeholder {
    /// Create a placeholder for entity type `code`.
    pub fn new(code: i32) -> Self {
        Self {
            directory: DirectoryEntry::new(code),
        }
    }

    /// The type code as it appeared in the file.
    pub fn type_code(&self) -> i32 {
        self.directory.entity_type
    }

    /// Documented name of the type code, if it is a known IGES type.
    pub fn type_name(&self) -> Option<&'static str> {
        entity_type_name(self.type_code())
    }
}

impl Entity for Placeholder {
    fn directory(&self) -> &DirectoryEntry {
        &self.directory
    }

    fn directory_mut(&mut self) -> &mut DirectoryEntry {
        &mut self.directory
    }

    fn entity_name(&self) -> &'static str {
        "Placeholder"
    }

    fn load_parameters(&mut self, _params: &ParameterList) -> Result<()> {
        Ok(())
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity {} ({}) DE {}",
            self.type_code(),
            self.type_name().unwrap_or("unknown type"),
            self.directory.sequence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_keeps_code() {
        let mut entity = Placeholder::new(128);
        entity.directory.sequence = 5;
        assert_eq!(entity.type_code(), 128);
        assert_eq!(entity.type_name(), Some("Rational B-Spline Surface"));
        assert_eq!(entity.to_string(), "Entity 128 (Rational B-Spline Surface) DE 5");
    }

    #[test]
    fn test_parameters_are_ignored() {
        let mut entity = Placeholder::new(9999);
        let params = ParameterList::parse(1, "9999,garbage,,", ',');
        assert!(entity.load_parameters(&params).is_ok());
        assert_eq!(entity.type_name(), None);
    }
}
