//! Fixed-width record codec.
//!
//! # Responsibility
//! - Encode one entry as `<name padded to column 20><number>\n`.
//! - Decode such a line back into a validated entry.
//!
//! # Invariants
//! - The name column is `NAME_COLUMN_WIDTH` characters wide and always ends
//!   in at least one padding space.
//! - The header line is never decoded as an entry.

use crate::model::entry::{Entry, EntryValidationError, NAME_MAX_CHARS};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Width of the padded name column, in characters.
pub const NAME_COLUMN_WIDTH: usize = NAME_MAX_CHARS + 1;

/// First line of every directory file.
pub const HEADER_LINE: &str = "NAME                    NUMBER\n";

pub type CodecResult<T> = Result<T, CodecError>;

/// Decode failures for a single record line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Line is shorter than the name column.
    MissingNameColumn { chars: usize },
    /// Name runs into the number column without padding.
    NameColumnOverflow,
    /// Fields decoded but do not form a valid entry.
    Entry(EntryValidationError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingNameColumn { chars } => write!(
                f,
                "record has {chars} characters; name column needs {NAME_COLUMN_WIDTH}"
            ),
            Self::NameColumnOverflow => write!(f, "record name column is not padded"),
            Self::Entry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Entry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for CodecError {
    fn from(value: EntryValidationError) -> Self {
        Self::Entry(value)
    }
}

/// Encodes an entry as one terminated record line.
///
/// Callers are expected to have validated `entry`; an over-long name is
/// written unpadded and will not decode.
pub fn encode_entry(entry: &Entry) -> String {
    let padding = NAME_COLUMN_WIDTH.saturating_sub(entry.name.chars().count());
    let mut line = String::with_capacity(NAME_COLUMN_WIDTH + entry.number.len() + 1);
    line.push_str(&entry.name);
    line.extend(std::iter::repeat(' ').take(padding));
    line.push_str(&entry.number);
    line.push('\n');
    line
}

/// Decodes one record line, with or without its terminator.
pub fn decode_line(line: &str) -> CodecResult<Entry> {
    let body = strip_terminator(line);

    let chars = body.chars().count();
    if chars < NAME_COLUMN_WIDTH {
        return Err(CodecError::MissingNameColumn { chars });
    }

    let split_at = body
        .char_indices()
        .nth(NAME_COLUMN_WIDTH)
        .map_or(body.len(), |(index, _)| index);
    let (name_column, number) = body.split_at(split_at);
    if !name_column.ends_with(' ') {
        return Err(CodecError::NameColumnOverflow);
    }

    let entry = Entry {
        name: name_column.trim_end().to_string(),
        number: number.to_string(),
    };
    entry.validate()?;
    Ok(entry)
}

/// Returns whether `line` is the directory header.
pub fn is_header(line: &str) -> bool {
    strip_terminator(line) == strip_terminator(HEADER_LINE)
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::{decode_line, encode_entry, is_header, CodecError, HEADER_LINE, NAME_COLUMN_WIDTH};
    use crate::model::entry::{Entry, EntryValidationError};

    #[test]
    fn encode_pads_name_to_number_column() {
        let line = encode_entry(&Entry::new("Alice", "5551234"));
        assert_eq!(line, "Alice               5551234\n");
        assert_eq!(line.find('5'), Some(NAME_COLUMN_WIDTH));
    }

    #[test]
    fn encode_keeps_one_space_for_longest_name() {
        let entry = Entry::new("abcdefghijklmnopqrs", "1");
        assert_eq!(encode_entry(&entry), "abcdefghijklmnopqrs 1\n");
    }

    #[test]
    fn header_matches_reference_layout() {
        assert_eq!(HEADER_LINE.len(), 31);
        assert!(HEADER_LINE.starts_with("NAME"));
        assert!(is_header(HEADER_LINE));
        assert!(is_header("NAME                    NUMBER\r\n"));
        assert!(!is_header("Alice               5551234\n"));
    }

    #[test]
    fn decode_inverts_encode() {
        for entry in [
            Entry::new("Alice", "5551234"),
            Entry::new("Jean Luc", "+33 1 2345"),
            Entry::new("Zoë Ångström", "0"),
            Entry::new("abcdefghijklmnopqrs", "0123456789"),
        ] {
            assert_eq!(decode_line(&encode_entry(&entry)).unwrap(), entry);
        }
    }

    #[test]
    fn decode_inverts_encode_for_literal_entries() {
        for (name, number) in [(" Al", "1"), ("Al", " 1 "), ("a  b", "55 5")] {
            let entry = Entry {
                name: name.to_string(),
                number: number.to_string(),
            };
            entry.validate().unwrap();
            assert_eq!(decode_line(&encode_entry(&entry)).unwrap(), entry);
        }
    }

    #[test]
    fn entries_that_would_lose_whitespace_are_invalid() {
        let entry = Entry {
            name: "Al ".to_string(),
            number: "1".to_string(),
        };
        assert_eq!(
            entry.validate(),
            Err(EntryValidationError::NameTrailingWhitespace)
        );
    }

    #[test]
    fn decode_accepts_crlf_terminator() {
        let entry = decode_line("Bob                 5555678\r\n").unwrap();
        assert_eq!(entry, Entry::new("Bob", "5555678"));
    }

    #[test]
    fn decode_rejects_short_line() {
        assert_eq!(
            decode_line("Bob 555\n"),
            Err(CodecError::MissingNameColumn { chars: 7 })
        );
    }

    #[test]
    fn decode_rejects_unpadded_name() {
        assert_eq!(
            decode_line("abcdefghijklmnopqrstu5551234\n"),
            Err(CodecError::NameColumnOverflow)
        );
    }

    #[test]
    fn decode_rejects_missing_number() {
        assert_eq!(
            decode_line("Bob                 \n"),
            Err(CodecError::Entry(EntryValidationError::EmptyNumber))
        );
    }
}
