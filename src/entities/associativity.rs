//! Associativity instance entity (type 402)
//!
//! Only form 15, the ordered group without back pointers, is read. Its
//! members are stitched into a chain the same way as a composite curve.
//! Other forms keep their directory entry and nothing else.

use super::composite_curve::CurveChain;
use super::{DirectoryEntry, Entity};
use crate::error::{IgesError, Result};
use crate::io::iges::parameters::ParameterList;
use std::fmt;

/// Form number of the ordered group without back pointers
pub const ORDERED_GROUP_FORM: i32 = 15;

#[derive(Debug, Clone)]
pub struct AssociativityInstance {
    /// Directory entry data
    pub directory: DirectoryEntry,
    /// Group members (form 15 only)
    pub chain: CurveChain,
}

impl AssociativityInstance {
    pub const TYPE_CODE: i32 = 402;

    pub fn new() -> Self {
        AssociativityInstance {
            directory: DirectoryEntry::new(Self::TYPE_CODE),
            chain: CurveChain::default(),
        }
    }

    /// Whether this form's members are read
    pub fn is_ordered_group(&self) -> bool {
        self.directory.form == ORDERED_GROUP_FORM
    }
}

impl Default for AssociativityInstance {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for AssociativityInstance {
    fn directory(&self) -> &DirectoryEntry {
        &self.directory
    }

    fn directory_mut(&mut self) -> &mut DirectoryEntry {
        &mut self.directory
    }

    fn entity_name(&self) -> &'static str {
        "AssociativityInstance"
    }

    fn load_parameters(&mut self, params: &ParameterList) -> Result<()> {
        if !self.is_ordered_group() {
            return Err(IgesError::UnsupportedVariant {
                entity_type: Self::TYPE_CODE,
                form: self.directory.form,
            });
        }
        self.chain = CurveChain::load(params, 1, "AssociativityInstance")?;
        Ok(())
    }
}

impl fmt::Display for AssociativityInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ordered_group() {
            write!(f, "OrderedGroup of {} members", self.chain.len())?;
            if self.chain.closed {
                write!(f, " (closed)")?;
            }
            Ok(())
        } else {
            write!(f, "AssociativityInstance form {}", self.directory.form)
        }
    }
}
