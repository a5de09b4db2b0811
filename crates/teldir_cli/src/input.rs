//! Line-based input parsing for the menu loop.
//!
//! # Invariants
//! - Malformed selectors and positions are recoverable errors.
//! - End of input is reported distinctly so the loop can exit cleanly.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use teldir_core::Position;

/// Menu selectors, numbered as printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Insert,
    Update,
    Delete,
    Exit,
}

impl MenuChoice {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        match parse_number(raw)? {
            1 => Ok(Self::Insert),
            2 => Ok(Self::Update),
            3 => Ok(Self::Delete),
            4 => Ok(Self::Exit),
            other => Err(InputError::UnknownChoice(other)),
        }
    }
}

#[derive(Debug)]
pub enum InputError {
    NotANumber(String),
    UnknownChoice(usize),
    EndOfInput,
    Io(io::Error),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANumber(raw) => write!(f, "`{raw}` is not a valid number"),
            Self::UnknownChoice(choice) => write!(f, "{choice} is not a menu option"),
            Self::EndOfInput => write!(f, "input closed"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for InputError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Parses a 1-based entry position. Range checks belong to the store.
pub fn parse_position(raw: &str) -> Result<Position, InputError> {
    parse_number(raw)
}

/// Writes `label`, then reads one line without its terminator.
pub fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    label: &str,
) -> Result<String, InputError> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(InputError::EndOfInput);
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

fn parse_number(raw: &str) -> Result<usize, InputError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_position, prompt, InputError, MenuChoice};
    use std::io::Cursor;

    #[test]
    fn menu_choice_parses_known_selectors() {
        assert_eq!(MenuChoice::parse("1").unwrap(), MenuChoice::Insert);
        assert_eq!(MenuChoice::parse(" 4 ").unwrap(), MenuChoice::Exit);
    }

    #[test]
    fn menu_choice_rejects_unknown_and_non_numeric() {
        assert!(matches!(
            MenuChoice::parse("7"),
            Err(InputError::UnknownChoice(7))
        ));
        assert!(matches!(
            MenuChoice::parse("two"),
            Err(InputError::NotANumber(raw)) if raw == "two"
        ));
    }

    #[test]
    fn position_rejects_negative_values() {
        assert!(matches!(
            parse_position("-1"),
            Err(InputError::NotANumber(_))
        ));
        assert_eq!(parse_position("0").unwrap(), 0);
    }

    #[test]
    fn prompt_strips_terminator_and_reports_eof() {
        let mut input = Cursor::new("Alice Smith\r\n");
        let mut output = Vec::new();

        let line = prompt(&mut input, &mut output, "Name: ").unwrap();
        assert_eq!(line, "Alice Smith");
        assert_eq!(output, b"Name: ");

        let err = prompt(&mut input, &mut output, "Name: ").unwrap_err();
        assert!(matches!(err, InputError::EndOfInput));
    }
}
