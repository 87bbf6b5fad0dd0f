//! Record-by-record section state machine
//!
//! Directory entries are two consecutive `D` records; parameter records are
//! runs of `P` lines that end with the record delimiter. Each parameter
//! line names its owner in columns 65-72, which must already be registered
//! in the pointer table.

use super::IgesReaderConfiguration;
use crate::document::{new_pointer_table, IgesDocument, PointerTable};
use crate::entities::{create_entity, entity_type_name, EntityType};
use crate::error::{IgesError, Result};
use crate::io::iges::global::{Delimiters, GlobalSectionParser};
use crate::io::iges::parameters::{ends_record, ParameterList};
use crate::io::iges::record::{Record, SectionCode};
use crate::notification::{NotificationCollection, NotificationType};
use ahash::AHashSet;
use rayon::prelude::*;

/// Parameter record being accumulated
#[derive(Debug)]
struct PendingParameter {
    index: usize,
    sequence: u32,
    text: String,
}

#[derive(Debug)]
enum ParserState {
    /// Outside the Directory and Parameter sections
    Idle,
    AwaitingDirectoryLine1,
    AwaitingDirectoryLine2(EntityType),
    AccumulatingParameter(PendingParameter),
}

pub(crate) struct SectionReader {
    state: ParserState,
    start: Vec<String>,
    global: GlobalSectionParser,
    entities: Vec<EntityType>,
    pointer_table: PointerTable,
    has_parameters: Vec<bool>,
    buffered: Vec<Option<ParameterList>>,
    reported_types: AHashSet<i32>,
    notifications: NotificationCollection,
    parallel: bool,
    failsafe: bool,
    last_line: usize,
}

impl SectionReader {
    pub fn new(config: &IgesReaderConfiguration) -> Self {
        Self {
            state: ParserState::Idle,
            start: Vec::new(),
            global: GlobalSectionParser::new(),
            entities: Vec::new(),
            pointer_table: new_pointer_table(),
            has_parameters: Vec::new(),
            buffered: Vec::new(),
            reported_types: AHashSet::new(),
            notifications: NotificationCollection::new(),
            parallel: config.parallel_parameters,
            failsafe: config.failsafe,
            last_line: 0,
        }
    }

    /// Feed the next physical record
    pub fn consume(&mut self, record: Record) -> Result<()> {
        self.last_line = record.line;
        match record.section {
            SectionCode::Start => {
                self.leave_entity_sections(record.line)?;
                self.start.push(record.data().trim_end().to_string());
                Ok(())
            }
            SectionCode::Global => {
                self.leave_entity_sections(record.line)?;
                self.global.push(&record);
                Ok(())
            }
            SectionCode::Directory => self.directory_record(record),
            SectionCode::Parameter => self.parameter_record(record),
            SectionCode::Terminate => self.leave_entity_sections(record.line),
        }
    }

    /// Check nothing is left half-read and build the document
    pub fn finish(mut self) -> Result<IgesDocument> {
        self.leave_entity_sections(self.last_line)?;
        if self.parallel {
            self.load_buffered()?;
        }
        Ok(IgesDocument::from_parts(
            self.start.join("\n"),
            self.global.finish(),
            self.entities,
            self.pointer_table,
            self.notifications,
        ))
    }

    fn leave_entity_sections(&mut self, line: usize) -> Result<()> {
        match std::mem::replace(&mut self.state, ParserState::Idle) {
            ParserState::AwaitingDirectoryLine2(entity) => Err(IgesError::malformed(
                line,
                format!("directory entry DE {} has no second line", entity.sequence()),
            )),
            ParserState::AccumulatingParameter(pending) => Err(IgesError::malformed(
                line,
                format!("parameter record of DE {} is not terminated", pending.sequence),
            )),
            ParserState::Idle | ParserState::AwaitingDirectoryLine1 => Ok(()),
        }
    }

    fn directory_record(&mut self, record: Record) -> Result<()> {
        match std::mem::replace(&mut self.state, ParserState::Idle) {
            ParserState::AwaitingDirectoryLine2(mut entity) => {
                entity.directory_mut().read_second_line(&record)?;
                self.register(entity, record.line)?;
                self.state = ParserState::AwaitingDirectoryLine1;
            }
            ParserState::AccumulatingParameter(pending) => {
                return Err(IgesError::malformed(
                    record.line,
                    format!(
                        "directory record inside the unterminated parameter record of DE {}",
                        pending.sequence
                    ),
                ));
            }
            ParserState::Idle | ParserState::AwaitingDirectoryLine1 => {
                let code = record.int_field(0, "entity type")?;
                let mut entity = create_entity(code);
                let directory = entity.directory_mut();
                directory.read_first_line(&record)?;
                if directory.has_transform() {
                    directory.transform_index = u32::try_from(directory.transform)
                        .ok()
                        .and_then(|p| self.pointer_table.get(&p).copied());
                }
                self.state = ParserState::AwaitingDirectoryLine2(entity);
            }
        }
        Ok(())
    }

    fn register(&mut self, entity: EntityType, line: usize) -> Result<()> {
        let sequence = entity.sequence();
        if self.pointer_table.contains_key(&sequence) {
            return Err(IgesError::malformed(
                line,
                format!("directory sequence number {} is used twice", sequence),
            ));
        }

        if let EntityType::Placeholder(placeholder) = &entity {
            let code = placeholder.type_code();
            if self.reported_types.insert(code) {
                self.notifications.notify_entity(
                    NotificationType::NotImplemented,
                    sequence,
                    format!(
                        "entity type {} ({}) is kept as directory data only",
                        code,
                        entity_type_name(code).unwrap_or("unknown type")
                    ),
                );
            }
        }

        let index = self.entities.len();
        self.entities.push(entity);
        self.pointer_table.insert(sequence, index);
        self.has_parameters.push(false);
        if self.parallel {
            self.buffered.push(None);
        }
        Ok(())
    }

    fn parameter_record(&mut self, record: Record) -> Result<()> {
        let mut pending = match std::mem::replace(&mut self.state, ParserState::Idle) {
            ParserState::AccumulatingParameter(pending) => {
                // Continuation lines only need to agree when they carry a pointer
                match record.optional_back_pointer()? {
                    Some(back_pointer) if back_pointer != pending.sequence => {
                        return Err(IgesError::malformed(
                            record.line,
                            format!(
                                "parameter line for DE {} inside the record of DE {}",
                                back_pointer, pending.sequence
                            ),
                        ));
                    }
                    _ => pending,
                }
            }
            ParserState::AwaitingDirectoryLine2(entity) => {
                return Err(IgesError::malformed(
                    record.line,
                    format!("directory entry DE {} has no second line", entity.sequence()),
                ));
            }
            ParserState::Idle | ParserState::AwaitingDirectoryLine1 => {
                let back_pointer = record.back_pointer()?;
                let index = *self.pointer_table.get(&back_pointer).ok_or_else(|| {
                    IgesError::malformed(
                        record.line,
                        format!(
                            "parameter record addressed to unknown directory entry {}",
                            back_pointer
                        ),
                    )
                })?;
                if self.has_parameters[index] {
                    return Err(IgesError::malformed(
                        record.line,
                        format!("second parameter record for DE {}", back_pointer),
                    ));
                }
                PendingParameter {
                    index,
                    sequence: back_pointer,
                    text: String::new(),
                }
            }
        };

        let delimiters = self.global.delimiters();
        pending.text.push_str(record.parameter_data());
        if ends_record(&pending.text, delimiters.parameter, delimiters.record) {
            self.complete_parameter(pending, delimiters)?;
        } else {
            self.state = ParserState::AccumulatingParameter(pending);
        }
        Ok(())
    }

    fn complete_parameter(&mut self, pending: PendingParameter, delimiters: Delimiters) -> Result<()> {
        let body = pending.text.trim();
        let body = body.strip_suffix(delimiters.record).unwrap_or(body);
        let params = ParameterList::parse(pending.sequence, body, delimiters.parameter);
        self.has_parameters[pending.index] = true;

        if self.parallel {
            self.buffered[pending.index] = Some(params);
            return Ok(());
        }
        let result = self.entities[pending.index]
            .as_entity_mut()
            .load_parameters(&params);
        self.absorb(pending.index, result)
    }

    /// Decode every buffered parameter record on the rayon pool
    fn load_buffered(&mut self) -> Result<()> {
        let buffered = std::mem::take(&mut self.buffered);
        let results: Vec<Result<()>> = self
            .entities
            .par_iter_mut()
            .zip(buffered.into_par_iter())
            .map(|(entity, params)| match params {
                Some(params) => entity.as_entity_mut().load_parameters(&params),
                None => Ok(()),
            })
            .collect();

        for (index, result) in results.into_iter().enumerate() {
            self.absorb(index, result)?;
        }
        Ok(())
    }

    /// Turn a recoverable load failure into a notification
    fn absorb(&mut self, index: usize, result: Result<()>) -> Result<()> {
        let Err(err) = result else {
            return Ok(());
        };
        let sequence = self.entities[index].sequence();
        if !err.is_fatal() {
            self.notifications
                .notify_entity(NotificationType::NotSupported, sequence, err.to_string());
            Ok(())
        } else if self.failsafe {
            self.notifications
                .notify_entity(NotificationType::Error, sequence, err.to_string());
            Ok(())
        } else {
            Err(err)
        }
    }
}
