//! Shared test utilities for igesrust integration tests.
//!
//! `IgesBuilder` writes small but well-formed IGES files: 80-column
//! records, a Global section declaring the chosen delimiters, two directory
//! lines per entity and parameter records wrapped at field boundaries.

#![allow(dead_code)]

use igesrust::{IgesDocument, IgesReader, IgesReaderConfiguration};

/// Data columns of a Global line
const GLOBAL_WIDTH: usize = 72;
/// Data columns of a parameter line
const PARAMETER_WIDTH: usize = 64;

// ===========================================================================
// Raw record helpers
// ===========================================================================

/// A record with `body` in columns 1-72
pub fn record(body: &str, section: char, sequence: usize) -> String {
    format!("{:<72}{}{:>7}", body, section, sequence)
}

/// A parameter line owned by directory entry `de`
pub fn parameter_line(data: &str, de: u32, sequence: usize) -> String {
    format!("{:<64}{:>8}P{:>7}", data, de, sequence)
}

/// The two directory lines of one entity
pub fn directory_lines(
    type_code: i32,
    parameter_pointer: usize,
    transform: u32,
    line_count: usize,
    form: i32,
    sequence: u32,
) -> [String; 2] {
    let first: String = [
        type_code.to_string(),
        parameter_pointer.to_string(),
        "0".into(),
        "0".into(),
        "0".into(),
        "0".into(),
        transform.to_string(),
        "0".into(),
        "00000000".into(),
    ]
    .iter()
    .map(|f| format!("{:>8}", f))
    .collect();
    let second: String = [
        type_code.to_string(),
        "0".into(),
        "0".into(),
        line_count.to_string(),
        form.to_string(),
        String::new(),
        String::new(),
        String::new(),
        "0".into(),
    ]
    .iter()
    .map(|f| format!("{:>8}", f))
    .collect();
    [
        format!("{}D{:>7}", first, sequence),
        format!("{}D{:>7}", second, sequence + 1),
    ]
}

/// Pack fields into lines no wider than `width`, never splitting a field
pub fn wrap_fields(fields: &[String], delimiter: char, terminator: char, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for (i, field) in fields.iter().enumerate() {
        let sep = if i + 1 == fields.len() { terminator } else { delimiter };
        let piece = format!("{}{}", field, sep);
        if !current.is_empty() && current.len() + piece.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        current.push_str(&piece);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn hollerith(text: &str) -> String {
    format!("{}H{}", text.chars().count(), text)
}

/// Format a real the way IGES writers do (always with a decimal point)
pub fn real(value: f64) -> String {
    let text = format!("{}", value);
    if text.contains('.') || text.contains('E') || text.contains('e') {
        text
    } else {
        format!("{}.", text)
    }
}

// ===========================================================================
// File builder
// ===========================================================================

struct PendingEntity {
    type_code: i32,
    form: i32,
    transform: u32,
    fields: Vec<String>,
}

/// Builds the text of an IGES file
pub struct IgesBuilder {
    parameter: char,
    record: char,
    start: Vec<String>,
    entities: Vec<PendingEntity>,
}

impl IgesBuilder {
    pub fn new() -> Self {
        Self::with_delimiters(',', ';')
    }

    pub fn with_delimiters(parameter: char, record: char) -> Self {
        Self {
            parameter,
            record,
            start: vec!["igesrust test file".to_string()],
            entities: Vec::new(),
        }
    }

    /// Sequence number the next entity will get
    pub fn next_sequence(&self) -> u32 {
        2 * self.entities.len() as u32 + 1
    }

    /// Add an entity; `fields` excludes the leading type code
    pub fn entity(&mut self, type_code: i32, form: i32, transform: u32, fields: Vec<String>) -> u32 {
        let sequence = self.next_sequence();
        self.entities.push(PendingEntity {
            type_code,
            form,
            transform,
            fields,
        });
        sequence
    }

    pub fn line(&mut self, start: [f64; 3], end: [f64; 3]) -> u32 {
        self.line_with_transform(start, end, 0)
    }

    pub fn line_with_transform(&mut self, start: [f64; 3], end: [f64; 3], transform: u32) -> u32 {
        let fields = start.iter().chain(end.iter()).map(|&v| real(v)).collect();
        self.entity(110, 0, transform, fields)
    }

    /// Arc in the plane `z` from `start` to `end` about `center`
    pub fn arc(&mut self, z: f64, center: [f64; 2], start: [f64; 2], end: [f64; 2]) -> u32 {
        let fields = [z, center[0], center[1], start[0], start[1], end[0], end[1]]
            .iter()
            .map(|&v| real(v))
            .collect();
        self.entity(100, 0, 0, fields)
    }

    /// Transformation matrix from the rows of `R` and the translation
    pub fn matrix(&mut self, rows: [[f64; 3]; 3], translation: [f64; 3], parent: u32) -> u32 {
        let mut fields = Vec::new();
        for (row, t) in rows.iter().zip(translation.iter()) {
            fields.extend(row.iter().map(|&v| real(v)));
            fields.push(real(*t));
        }
        self.entity(124, 0, parent, fields)
    }

    pub fn translation(&mut self, offset: [f64; 3]) -> u32 {
        self.matrix(
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            offset,
            0,
        )
    }

    pub fn composite(&mut self, members: &[u32]) -> u32 {
        self.composite_with_transform(members, 0)
    }

    pub fn composite_with_transform(&mut self, members: &[u32], transform: u32) -> u32 {
        let mut fields = vec![members.len().to_string()];
        fields.extend(members.iter().map(|m| m.to_string()));
        self.entity(102, 0, transform, fields)
    }

    pub fn group(&mut self, form: i32, members: &[u32]) -> u32 {
        let mut fields = vec![members.len().to_string()];
        fields.extend(members.iter().map(|m| m.to_string()));
        self.entity(402, form, 0, fields)
    }

    /// Rational B-spline with a clamped uniform knot vector
    pub fn bspline(&mut self, degree: usize, control_points: &[[f64; 3]], weights: &[f64]) -> u32 {
        let k = control_points.len() - 1;
        let spans = k + 1 - degree;
        let mut knots = vec![0.0; degree + 1];
        knots.extend((1..spans).map(|i| i as f64 / spans as f64));
        knots.extend(vec![1.0; degree + 1]);

        let mut fields = vec![k.to_string(), degree.to_string()];
        fields.extend(["0", "0", "0", "0"].iter().map(|s| s.to_string()));
        fields.extend(knots.iter().map(|&v| real(v)));
        fields.extend(weights.iter().map(|&v| real(v)));
        for p in control_points {
            fields.extend(p.iter().map(|&v| real(v)));
        }
        fields.push(real(0.0));
        fields.push(real(1.0));
        self.entity(126, 0, 0, fields)
    }

    fn global_fields(&self) -> Vec<String> {
        let mut fields = vec![
            format!("1H{}", self.parameter),
            format!("1H{}", self.record),
            hollerith("TESTSYS"),
            hollerith("test.igs"),
            hollerith("igesrust"),
            hollerith("0.1"),
            "32".into(),
            "38".into(),
            "6".into(),
            "308".into(),
            "15".into(),
            hollerith("TESTSYS"),
            "1.".into(),
            "2".into(),
            hollerith("MM"),
            "1".into(),
            "0.1".into(),
            hollerith("20240101.120000"),
            "1.E-05".into(),
            "1000.".into(),
            hollerith("Author"),
            hollerith("Org"),
            "11".into(),
            "0".into(),
        ];
        fields.push(hollerith("20240101.120000"));
        fields
    }

    pub fn build(&self) -> String {
        let mut out = Vec::new();
        for (i, s) in self.start.iter().enumerate() {
            out.push(record(s, 'S', i + 1));
        }

        let global = wrap_fields(&self.global_fields(), self.parameter, self.record, GLOBAL_WIDTH);
        for (i, g) in global.iter().enumerate() {
            out.push(record(g, 'G', i + 1));
        }

        let mut directory = Vec::new();
        let mut parameters = Vec::new();
        for (i, entity) in self.entities.iter().enumerate() {
            let sequence = 2 * i as u32 + 1;
            let mut fields = vec![entity.type_code.to_string()];
            fields.extend(entity.fields.iter().cloned());
            let lines = wrap_fields(&fields, self.parameter, self.record, PARAMETER_WIDTH);
            let pointer = parameters.len() + 1;
            for line in &lines {
                parameters.push(parameter_line(line, sequence, parameters.len() + 1));
            }
            directory.extend(directory_lines(
                entity.type_code,
                pointer,
                entity.transform,
                lines.len(),
                entity.form,
                sequence,
            ));
        }
        let directory_count = directory.len();
        let parameter_count = parameters.len();
        out.extend(directory);
        out.extend(parameters);

        let terminate = format!(
            "S{:>7}G{:>7}D{:>7}P{:>7}",
            self.start.len(),
            global.len(),
            directory_count,
            parameter_count
        );
        out.push(record(&terminate, 'T', 1));

        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    pub fn read(&self) -> IgesDocument {
        read_text(&self.build())
    }
}

impl Default for IgesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Read helpers
// ===========================================================================

/// Read IGES text, panicking on error
pub fn read_text(text: &str) -> IgesDocument {
    IgesReader::from_text(text)
        .read()
        .unwrap_or_else(|e| panic!("read failed: {e}\n{text}"))
}

pub fn read_with(text: &str, config: IgesReaderConfiguration) -> igesrust::Result<IgesDocument> {
    IgesReader::from_text(text).with_configuration(config).read()
}

pub fn assert_close(actual: igesrust::Vector3, expected: [f64; 3], tolerance: f64) {
    let expected = igesrust::Vector3::new(expected[0], expected[1], expected[2]);
    assert!(
        actual.distance(&expected) <= tolerance,
        "expected {expected}, got {actual}"
    );
}
