//! Parameter field tokenising and typed access
//!
//! Free-format IGES data (the Global section and every Parameter Data
//! record) is a list of fields separated by the file's parameter delimiter.
//! Fields are integers, reals (Fortran `D` exponents allowed), pointers, or
//! Hollerith strings (`5HHELLO`). Hollerith strings may contain the delimiter
//! itself, so splitting skips over them.

use crate::error::{IgesError, Result};
use crate::types::Vector3;
use nom::branch::alt;
use nom::character::complete::{char, digit0, digit1, one_of};
use nom::combinator::{all_consuming, map_res, opt, recognize};
use nom::sequence::{pair, terminated, tuple};
use nom::IResult;
use std::ops::Range;

/// Split a delimited record into raw (trimmed) field strings
pub fn split_fields(record: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut rest = record;
    loop {
        let leading = rest.len() - rest.trim_start().len();
        let skip = hollerith_extent(&rest[leading..]).map_or(0, |n| leading + n);
        match rest[skip..].find(delimiter) {
            Some(pos) => {
                let end = skip + pos;
                fields.push(rest[..end].trim().to_string());
                rest = &rest[end + delimiter.len_utf8()..];
            }
            None => {
                fields.push(rest.trim().to_string());
                break;
            }
        }
    }
    fields
}

/// Whether accumulated free-format text ends with a record terminator
///
/// A trailing record delimiter that belongs to an unfinished field such as
/// `1H;` is string content, not a terminator.
pub fn ends_record(text: &str, parameter: char, record: char) -> bool {
    let text = text.trim();
    if !text.ends_with(record) {
        return false;
    }
    let fields = split_fields(text, parameter);
    let last = fields.last().map(String::as_str).unwrap_or("");
    hollerith_extent(last) != Some(last.len())
}

fn hollerith_prefix(input: &str) -> IResult<&str, usize> {
    map_res(terminated(digit1, char('H')), str::parse::<usize>)(input)
}

/// Byte length of a Hollerith string at the start of `input`, prefix included
pub(crate) fn hollerith_extent(input: &str) -> Option<usize> {
    let (body, count) = hollerith_prefix(input).ok()?;
    let prefix_len = input.len() - body.len();
    if count == 0 {
        return Some(prefix_len);
    }
    let (last, ch) = body.char_indices().nth(count - 1)?;
    Some(prefix_len + last + ch.len_utf8())
}

/// Decode a Hollerith field (`3HABC` → `ABC`)
pub fn decode_hollerith(field: &str) -> Option<String> {
    let field = field.trim_start();
    let (body, count) = hollerith_prefix(field).ok()?;
    let text: String = body.chars().take(count).collect();
    (text.chars().count() == count).then_some(text)
}

fn real_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eEdD"), opt(one_of("+-")), digit1))),
    )))(input)
}

fn integer_literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(one_of("+-")), digit1))(input)
}

/// Parse an IGES real; empty fields take the default value 0
pub fn parse_real(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0.0);
    }
    let (_, literal) = all_consuming(real_literal)(field).ok()?;
    literal.replace(['D', 'd'], "E").parse().ok()
}

/// Parse an IGES integer; empty fields take the default value 0
///
/// A real with no fractional part (`2.`, `3.0D0`) is accepted too, since
/// some writers emit counts that way.
pub fn parse_integer(field: &str) -> Option<i64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0);
    }
    if let Ok((_, literal)) = all_consuming(integer_literal)(field) {
        return literal.parse().ok();
    }
    let value = parse_real(field)?;
    (value.fract() == 0.0 && value.abs() < i64::MAX as f64).then(|| value as i64)
}

/// The fields of one parameter record, with typed accessors that report
/// out-of-range indices as [`IgesError::ParameterCountMismatch`]
///
/// Index 0 is the leading field the record restates about its entity;
/// loaders read from index 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterList {
    sequence: u32,
    fields: Vec<String>,
}

impl ParameterList {
    /// Wrap already-split fields belonging to directory entry `sequence`
    pub fn new(sequence: u32, fields: Vec<String>) -> Self {
        Self { sequence, fields }
    }

    /// Split a record body (record delimiter already removed)
    pub fn parse(sequence: u32, record: &str, delimiter: char) -> Self {
        Self::new(sequence, split_fields(record, delimiter))
    }

    /// Directory sequence number of the owning entity
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Number of fields, including field 0
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record had no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether field `index` exists
    pub fn has(&self, index: usize) -> bool {
        index < self.fields.len()
    }

    /// Raw text of field `index`
    pub fn raw(&self, index: usize, entity: &'static str) -> Result<&str> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.missing(index, entity))
    }

    pub fn real(&self, index: usize, entity: &'static str) -> Result<f64> {
        let raw = self.raw(index, entity)?;
        parse_real(raw).ok_or_else(|| self.invalid(index, raw, "real"))
    }

    pub fn integer(&self, index: usize, entity: &'static str) -> Result<i64> {
        let raw = self.raw(index, entity)?;
        parse_integer(raw).ok_or_else(|| self.invalid(index, raw, "integer"))
    }

    /// A non-negative count
    pub fn count(&self, index: usize, entity: &'static str) -> Result<usize> {
        let raw = self.raw(index, entity)?;
        parse_integer(raw)
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| self.invalid(index, raw, "non-negative count"))
    }

    /// Three consecutive reals starting at `index`
    pub fn point(&self, index: usize, entity: &'static str) -> Result<Vector3> {
        Ok(Vector3::new(
            self.real(index, entity)?,
            self.real(index + 1, entity)?,
            self.real(index + 2, entity)?,
        ))
    }

    /// Every field in `range` as a real
    pub fn reals(&self, range: Range<usize>, entity: &'static str) -> Result<Vec<f64>> {
        range.map(|i| self.real(i, entity)).collect()
    }

    /// Field `index` decoded as a Hollerith string
    pub fn string(&self, index: usize, entity: &'static str) -> Result<String> {
        let raw = self.raw(index, entity)?;
        if raw.is_empty() {
            return Ok(String::new());
        }
        decode_hollerith(raw).ok_or_else(|| self.invalid(index, raw, "Hollerith string"))
    }

    /// Build a `ParameterCountMismatch` error for field `index`
    pub fn missing(&self, index: usize, entity: &'static str) -> IgesError {
        IgesError::ParameterCountMismatch {
            sequence: self.sequence,
            entity,
            index,
            available: self.fields.len(),
        }
    }

    /// Build an `InvalidParameter` error for field `index`
    pub fn invalid(&self, index: usize, raw: &str, expected: &'static str) -> IgesError {
        IgesError::InvalidParameter {
            sequence: self.sequence,
            index,
            value: raw.to_string(),
            expected,
        }
    }
}
