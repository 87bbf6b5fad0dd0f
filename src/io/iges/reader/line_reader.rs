//! Physical line reader

use crate::error::Result;
use crate::io::iges::record::RECORD_WIDTH;
use encoding_rs::{Encoding, WINDOWS_1252};
use std::collections::VecDeque;
use std::io::BufRead;

/// Reads the physical lines of an IGES file
///
/// Bytes that are not valid UTF-8 (Hollerith text written by older CAD
/// systems) are decoded with a single-byte fallback encoding. Files written
/// without line breaks, as one long run of 80-column records, are split back
/// into records.
pub struct LineReader<R: BufRead> {
    reader: R,
    line_number: usize,
    pending: VecDeque<String>,
    encoding: &'static Encoding,
}

impl<R: BufRead> LineReader<R> {
    /// Create a new line reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            pending: VecDeque::new(),
            encoding: WINDOWS_1252,
        }
    }

    /// Use a different fallback encoding for non-UTF-8 lines
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// One-based number of the line most recently returned
    ///
    /// Blank lines count, and so does each record split out of an unbroken
    /// run.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next non-empty physical record, or `None` at end of input
    pub fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                self.line_number += 1;
                return Ok(Some(line));
            }

            let mut bytes = Vec::new();
            if self.reader.read_until(b'\n', &mut bytes)? == 0 {
                return Ok(None);
            }
            while matches!(bytes.last(), Some(b'\n' | b'\r')) {
                bytes.pop();
            }
            if bytes.iter().all(|b| b.is_ascii_whitespace()) {
                self.line_number += 1;
                continue;
            }

            let line = match String::from_utf8(bytes) {
                Ok(s) => s,
                Err(e) => {
                    let (decoded, _, _) = self.encoding.decode(e.as_bytes());
                    decoded.into_owned()
                }
            };
            self.split_records(line);
        }
    }

    fn split_records(&mut self, line: String) {
        let width = line.chars().count();
        if width <= RECORD_WIDTH || width % RECORD_WIDTH != 0 {
            self.pending.push_back(line);
            return;
        }
        let chars: Vec<char> = line.chars().collect();
        for chunk in chars.chunks(RECORD_WIDTH) {
            self.pending.push_back(chunk.iter().collect());
        }
    }
}
