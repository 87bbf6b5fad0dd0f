//! Composite curve entity (type 102) and the child list it shares with
//! ordered groups

use super::{DirectoryEntry, Entity};
use crate::error::Result;
use crate::io::iges::parameters::ParameterList;
use std::fmt;

/// An ordered list of child entities joined end to end
///
/// `pointers` holds the directory pointers as read. Once the document
/// resolves them, `children` holds arena indices in chain order, with the
/// children's orientation already adjusted so that consecutive endpoints
/// meet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveChain {
    pub pointers: Vec<i64>,
    pub children: Vec<usize>,
    /// Last child ends where the first begins
    pub closed: bool,
    /// Children have been reordered and oriented
    pub assembled: bool,
}

impl CurveChain {
    /// Read a count at `index` followed by that many pointers
    pub fn load(params: &ParameterList, index: usize, entity: &'static str) -> Result<Self> {
        let count = params.count(index, entity)?;
        let pointers = (index + 1..index + 1 + count)
            .map(|i| params.integer(i, entity))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            pointers,
            ..Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }
}

/// A curve made of child curves joined end to end
#[derive(Debug, Clone)]
pub struct CompositeCurve {
    /// Directory entry data
    pub directory: DirectoryEntry,
    pub chain: CurveChain,
}

impl CompositeCurve {
    pub const TYPE_CODE: i32 = 102;

    pub fn new() -> Self {
        CompositeCurve {
            directory: DirectoryEntry::new(Self::TYPE_CODE),
            chain: CurveChain::default(),
        }
    }
}

impl Default for CompositeCurve {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for CompositeCurve {
    fn directory(&self) -> &DirectoryEntry {
        &self.directory
    }

    fn directory_mut(&mut self) -> &mut DirectoryEntry {
        &mut self.directory
    }

    fn entity_name(&self) -> &'static str {
        "CompositeCurve"
    }

    fn load_parameters(&mut self, params: &ParameterList) -> Result<()> {
        self.chain = CurveChain::load(params, 1, "CompositeCurve")?;
        Ok(())
    }
}

impl fmt::Display for CompositeCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeCurve of {} curves", self.chain.len())?;
        if self.chain.closed {
            write!(f, " (closed)")?;
        }
        Ok(())
    }
}
