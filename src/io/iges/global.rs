//! Global section parsing
//!
//! The first two Global fields declare the parameter and record delimiters
//! used by the rest of the file. The remaining fields describe the sending
//! system, units and precision; they are informational and never abort a
//! load.

use crate::io::iges::parameters::{
    decode_hollerith, ends_record, parse_integer, parse_real, split_fields,
};
use crate::io::iges::record::Record;
use std::fmt;

/// Default parameter delimiter
pub const DEFAULT_PARAMETER_DELIMITER: char = ',';
/// Default record delimiter
pub const DEFAULT_RECORD_DELIMITER: char = ';';

/// Field and record separators declared by the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Separates fields within a record
    pub parameter: char,
    /// Terminates a record
    pub record: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            parameter: DEFAULT_PARAMETER_DELIMITER,
            record: DEFAULT_RECORD_DELIMITER,
        }
    }
}

impl Delimiters {
    /// Read the delimiters from the first Global line
    ///
    /// The usual form is `1H,,1H;,` where the 3rd and 7th characters are the
    /// delimiters. Either field may be omitted (left empty), in which case the
    /// default applies.
    pub fn from_first_line(data: &str) -> Self {
        let chars: Vec<char> = data.chars().collect();
        let hollerith_at = |i: usize| -> Option<char> {
            match (chars.get(i), chars.get(i + 1), chars.get(i + 2)) {
                (Some('1'), Some('H'), Some(&c)) => Some(c),
                _ => None,
            }
        };

        let (parameter, next) = match hollerith_at(0) {
            Some(c) => (c, 4),
            None => (DEFAULT_PARAMETER_DELIMITER, 1),
        };
        let record = hollerith_at(next).unwrap_or(DEFAULT_RECORD_DELIMITER);
        Self { parameter, record }
    }
}

/// Model units declared by the units flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Inches,
    Millimeters,
    /// Named by the units-name field
    Custom,
    Feet,
    Miles,
    Meters,
    Kilometers,
    Mils,
    Microns,
    Centimeters,
    Microinches,
}

impl Units {
    pub fn from_flag(flag: i64) -> Option<Self> {
        Some(match flag {
            1 => Self::Inches,
            2 => Self::Millimeters,
            3 => Self::Custom,
            4 => Self::Feet,
            5 => Self::Miles,
            6 => Self::Meters,
            7 => Self::Kilometers,
            8 => Self::Mils,
            9 => Self::Microns,
            10 => Self::Centimeters,
            11 => Self::Microinches,
            _ => return None,
        })
    }
}

/// Decoded Global section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalSection {
    pub delimiters: Delimiters,
    /// Consolidated Global text (columns 1-72 of every line)
    pub raw: String,
    pub sending_product_id: Option<String>,
    pub file_name: Option<String>,
    pub native_system_id: Option<String>,
    pub preprocessor_version: Option<String>,
    pub integer_bits: Option<i64>,
    pub single_precision_magnitude: Option<i64>,
    pub single_precision_significance: Option<i64>,
    pub double_precision_magnitude: Option<i64>,
    pub double_precision_significance: Option<i64>,
    pub receiving_product_id: Option<String>,
    pub model_space_scale: Option<f64>,
    pub units_flag: Option<i64>,
    pub units_name: Option<String>,
    pub line_weight_gradations: Option<i64>,
    pub max_line_weight: Option<f64>,
    pub file_generation_date: Option<String>,
    pub min_resolution: Option<f64>,
    pub max_coordinate: Option<f64>,
    pub author: Option<String>,
    pub organization: Option<String>,
    pub version_flag: Option<i64>,
    pub drafting_standard: Option<i64>,
    pub model_creation_date: Option<String>,
}

impl GlobalSection {
    /// Decode the consolidated Global text
    pub fn parse(raw: &str, delimiters: Delimiters) -> Self {
        let body = raw.trim_end();
        let body = body.strip_suffix(delimiters.record).unwrap_or(body);
        let fields = split_fields(body, delimiters.parameter);

        // Fields are numbered from 1 in the IGES documentation.
        let field = |n: usize| fields.get(n - 1).map(String::as_str).filter(|f| !f.is_empty());
        let string = |n: usize| field(n).and_then(decode_hollerith);
        let integer = |n: usize| field(n).and_then(parse_integer);
        let real = |n: usize| field(n).and_then(parse_real);

        Self {
            delimiters,
            raw: raw.to_string(),
            sending_product_id: string(3),
            file_name: string(4),
            native_system_id: string(5),
            preprocessor_version: string(6),
            integer_bits: integer(7),
            single_precision_magnitude: integer(8),
            single_precision_significance: integer(9),
            double_precision_magnitude: integer(10),
            double_precision_significance: integer(11),
            receiving_product_id: string(12),
            model_space_scale: real(13),
            units_flag: integer(14),
            units_name: string(15),
            line_weight_gradations: integer(16),
            max_line_weight: real(17),
            file_generation_date: string(18),
            min_resolution: real(19),
            max_coordinate: real(20),
            author: string(21),
            organization: string(22),
            version_flag: integer(23),
            drafting_standard: integer(24),
            model_creation_date: string(25),
        }
    }

    /// Units declared by the units flag, if recognized
    pub fn units(&self) -> Option<Units> {
        self.units_flag.and_then(Units::from_flag)
    }
}

impl fmt::Display for GlobalSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        write!(
            f,
            "Global: product '{}' file '{}' system '{}' units {:?} (delimiters '{}' '{}')",
            text(&self.sending_product_id),
            text(&self.file_name),
            text(&self.native_system_id),
            self.units(),
            self.delimiters.parameter,
            self.delimiters.record
        )
    }
}

/// Accumulates Global lines until the record delimiter closes the section
#[derive(Debug, Default)]
pub struct GlobalSectionParser {
    text: String,
    delimiters: Option<Delimiters>,
    section: Option<GlobalSection>,
}

impl GlobalSectionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delimiters seen so far (defaults before the first Global line)
    pub fn delimiters(&self) -> Delimiters {
        self.delimiters.unwrap_or_default()
    }

    /// Add one Global record; returns `true` once the section is complete
    pub fn push(&mut self, record: &Record) -> bool {
        if self.section.is_some() {
            return true;
        }
        let data = record.data();
        let delimiters = *self
            .delimiters
            .get_or_insert_with(|| Delimiters::from_first_line(data));
        self.text.push_str(data);

        if ends_record(&self.text, delimiters.parameter, delimiters.record) {
            self.section = Some(GlobalSection::parse(self.text.trim(), delimiters));
        }
        self.section.is_some()
    }

    /// The decoded section; an unterminated section is decoded as-is
    pub fn finish(self) -> GlobalSection {
        let delimiters = self.delimiters.unwrap_or_default();
        self.section
            .unwrap_or_else(|| GlobalSection::parse(self.text.trim(), delimiters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_record(line: usize, body: &str) -> Record {
        Record::parse(line, &format!("{:<72}G{:>7}", body, line)).unwrap()
    }

    #[test]
    fn test_default_delimiters_declared() {
        let d = Delimiters::from_first_line("1H,,1H;,4HTEST,");
        assert_eq!(d, Delimiters::default());
    }

    #[test]
    fn test_custom_delimiters() {
        let d = Delimiters::from_first_line("1H//1H#/4HTEST/");
        assert_eq!(d.parameter, '/');
        assert_eq!(d.record, '#');
    }

    #[test]
    fn test_omitted_delimiters_take_defaults() {
        assert_eq!(Delimiters::from_first_line(",,4HTEST,"), Delimiters::default());
        let d = Delimiters::from_first_line(",1H:,4HTEST,");
        assert_eq!(d.parameter, ',');
        assert_eq!(d.record, ':');
    }

    #[test]
    fn test_parser_accumulates_until_record_delimiter() {
        let mut parser = GlobalSectionParser::new();
        assert!(!parser.push(&global_record(1, "1H,,1H;,7HProduct,8Hpart.igs,6HSystem,3H1.0,32,38,6,308,")));
        assert!(parser.push(&global_record(2, "15,7HProduct,1.0,2,2HMM,1,0.1,13H20240101.1200,0.001,1000.;")));
        let global = parser.finish();
        assert_eq!(global.sending_product_id.as_deref(), Some("Product"));
        assert_eq!(global.file_name.as_deref(), Some("part.igs"));
        assert_eq!(global.integer_bits, Some(32));
        assert_eq!(global.model_space_scale, Some(1.0));
        assert_eq!(global.units(), Some(Units::Millimeters));
        assert_eq!(global.units_name.as_deref(), Some("MM"));
        assert_eq!(global.min_resolution, Some(0.001));
        assert_eq!(global.max_coordinate, Some(1000.0));
        assert_eq!(global.author, None);
    }

    #[test]
    fn test_delimiter_declaration_does_not_end_section() {
        let mut parser = GlobalSectionParser::new();
        assert!(!parser.push(&global_record(1, "1H,,1H;")));
        assert!(parser.push(&global_record(2, ",4HPART;")));
        assert_eq!(parser.finish().sending_product_id.as_deref(), Some("PART"));
    }

    #[test]
    fn test_unterminated_section_still_decodes() {
        let mut parser = GlobalSectionParser::new();
        parser.push(&global_record(1, "1H,,1H;,4HPART"));
        let global = parser.finish();
        assert_eq!(global.sending_product_id.as_deref(), Some("PART"));
    }
}
