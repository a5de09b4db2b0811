//! Entry domain model.
//!
//! # Responsibility
//! - Define the name/number record persisted one-per-line.
//! - Normalize raw user input into the fixed field widths.
//!
//! # Invariants
//! - `name` holds at most `NAME_MAX_CHARS` characters.
//! - `number` holds at most `NUMBER_MAX_CHARS` characters.
//! - Neither field contains control characters, so one entry is one line.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Usable name width. The name column is one wider so padding never vanishes.
pub const NAME_MAX_CHARS: usize = 19;
/// Usable number width.
pub const NUMBER_MAX_CHARS: usize = 10;

static CONTROL_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Cc}").expect("valid control char regex"));

/// Validation failures for entry fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyName,
    EmptyNumber,
    /// Field name that carried a control character.
    ControlCharacter(&'static str),
    /// Trailing whitespace would merge into the name column padding.
    NameTrailingWhitespace,
    NameTooLong { chars: usize },
    NumberTooLong { chars: usize },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::EmptyNumber => write!(f, "number cannot be empty"),
            Self::ControlCharacter(field) => {
                write!(f, "{field} cannot contain control characters")
            }
            Self::NameTrailingWhitespace => write!(f, "name cannot end with whitespace"),
            Self::NameTooLong { chars } => write!(
                f,
                "name has {chars} characters; at most {NAME_MAX_CHARS} are allowed"
            ),
            Self::NumberTooLong { chars } => write!(
                f,
                "number has {chars} characters; at most {NUMBER_MAX_CHARS} are allowed"
            ),
        }
    }
}

impl Error for EntryValidationError {}

/// One name/number record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Free-form text. No phone-number format is enforced.
    pub number: String,
}

impl Entry {
    /// Builds an entry from raw input.
    ///
    /// Surrounding whitespace is trimmed and each field is truncated to its
    /// usable width. The result still has to pass [`Entry::validate`].
    pub fn new(name: impl AsRef<str>, number: impl AsRef<str>) -> Self {
        Self {
            name: fit_field(name.as_ref(), NAME_MAX_CHARS),
            number: fit_field(number.as_ref(), NUMBER_MAX_CHARS),
        }
    }

    /// Checks the field invariants required before persistence.
    ///
    /// # Errors
    /// - `EmptyName` / `EmptyNumber` for blank fields.
    /// - `ControlCharacter` when a field would break the line format.
    /// - `NameTrailingWhitespace` when the name would not survive decoding.
    /// - `NameTooLong` / `NumberTooLong` for values built without [`Entry::new`].
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.name.trim().is_empty() {
            return Err(EntryValidationError::EmptyName);
        }
        if self.number.trim().is_empty() {
            return Err(EntryValidationError::EmptyNumber);
        }
        if CONTROL_CHAR_RE.is_match(&self.name) {
            return Err(EntryValidationError::ControlCharacter("name"));
        }
        if CONTROL_CHAR_RE.is_match(&self.number) {
            return Err(EntryValidationError::ControlCharacter("number"));
        }
        if self.name.trim_end() != self.name {
            return Err(EntryValidationError::NameTrailingWhitespace);
        }

        let name_chars = self.name.chars().count();
        if name_chars > NAME_MAX_CHARS {
            return Err(EntryValidationError::NameTooLong { chars: name_chars });
        }
        let number_chars = self.number.chars().count();
        if number_chars > NUMBER_MAX_CHARS {
            return Err(EntryValidationError::NumberTooLong {
                chars: number_chars,
            });
        }

        Ok(())
    }
}

fn fit_field(value: &str, max_chars: usize) -> String {
    let truncated = value.trim().chars().take(max_chars).collect::<String>();
    // Truncation can expose inner whitespace at the cut point.
    truncated.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::{Entry, EntryValidationError, NAME_MAX_CHARS, NUMBER_MAX_CHARS};

    #[test]
    fn new_trims_and_truncates_fields() {
        let entry = Entry::new("  Bartholomew Fitzgerald-Smythe ", " 0123456789012 ");
        assert_eq!(entry.name.chars().count(), NAME_MAX_CHARS);
        assert_eq!(entry.name, "Bartholomew Fitzger");
        assert_eq!(entry.number, "0123456789");
        assert_eq!(entry.number.chars().count(), NUMBER_MAX_CHARS);
    }

    #[test]
    fn new_drops_whitespace_exposed_by_truncation() {
        let entry = Entry::new("abcdefghijklmnopqr xyz", "1");
        assert_eq!(entry.name, "abcdefghijklmnopqr");
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert_eq!(
            Entry::new("   ", "5551234").validate(),
            Err(EntryValidationError::EmptyName)
        );
        assert_eq!(
            Entry::new("Alice", "").validate(),
            Err(EntryValidationError::EmptyNumber)
        );
    }

    #[test]
    fn validate_rejects_line_breaks() {
        let entry = Entry {
            name: "Al\nice".to_string(),
            number: "5551234".to_string(),
        };
        assert_eq!(
            entry.validate(),
            Err(EntryValidationError::ControlCharacter("name"))
        );
    }

    #[test]
    fn validate_rejects_trailing_name_whitespace() {
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
    fn validate_rejects_overlong_literal_fields() {
        let entry = Entry {
            name: "Alice".to_string(),
            number: "55512345678".to_string(),
        };
        assert_eq!(
            entry.validate(),
            Err(EntryValidationError::NumberTooLong { chars: 11 })
        );
    }

    #[test]
    fn number_format_is_not_checked() {
        assert!(Entry::new("Office", "ext. 42").validate().is_ok());
    }
}
