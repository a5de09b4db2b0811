//! Interactive menu loop.
//!
//! # Responsibility
//! - Render the menu and prompts, dispatch to `DirectoryService`.
//! - Report per-action failures and keep the session running.
//!
//! # Invariants
//! - Only output failures end the loop with an error; end of input exits.

use crate::input::{parse_position, prompt, InputError, MenuChoice};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use teldir_core::{encode_entry, DirectoryService, DirectoryStore, StoreError, HEADER_LINE};

const MENU: &str = "Telephone Directory Menu:\n\
1. Insert an entry\n\
2. Update an entry\n\
3. Delete an entry\n\
4. Exit\n";

#[derive(Debug)]
enum ActionError {
    Input(InputError),
    /// Entry number that did not parse.
    InvalidPosition(String),
    Store(StoreError),
}

impl Display for ActionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::InvalidPosition(raw) => write!(f, "`{raw}` is not a valid entry number"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ActionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::InvalidPosition(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<InputError> for ActionError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

impl From<StoreError> for ActionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<io::Error> for ActionError {
    fn from(value: io::Error) -> Self {
        Self::Input(InputError::Io(value))
    }
}

/// Runs the menu until Exit or end of input.
///
/// Returns an error only when `output` cannot be written or flushed.
pub fn run_session<S: DirectoryStore>(
    service: &mut DirectoryService<S>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()> {
    loop {
        write!(output, "{MENU}")?;
        let choice = match prompt(input, output, "Enter your choice: ")
            .and_then(|raw| MenuChoice::parse(&raw))
        {
            Ok(choice) => choice,
            Err(InputError::EndOfInput) => return finish(output),
            Err(InputError::Io(err)) => return Err(err),
            Err(InputError::NotANumber(_) | InputError::UnknownChoice(_)) => {
                writeln!(output, "Invalid operation.")?;
                writeln!(output)?;
                continue;
            }
        };

        let outcome = match choice {
            MenuChoice::Insert => insert_action(service, input, output),
            MenuChoice::Update => update_action(service, input, output),
            MenuChoice::Delete => delete_action(service, input, output),
            MenuChoice::Exit => return finish(output),
        };

        match outcome {
            Ok(()) => {}
            Err(ActionError::Input(InputError::EndOfInput)) => return finish(output),
            Err(ActionError::Input(InputError::Io(err))) => return Err(err),
            Err(err) => {
                warn!("event=menu_action module=cli status=error error={err}");
                writeln!(output, "Error: {err}")?;
            }
        }
        writeln!(output)?;
    }
}

fn finish(output: &mut impl Write) -> io::Result<()> {
    writeln!(output, "Exiting...")?;
    output.flush()?;
    info!("event=session_end module=cli status=ok");
    Ok(())
}

fn insert_action<S: DirectoryStore>(
    service: &mut DirectoryService<S>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<(), ActionError> {
    writeln!(output, "New entry #{}", service.next_entry_number())?;
    let name = prompt(input, output, "Enter the name: ")?;
    let number = prompt(input, output, "Enter the phone number: ")?;

    let position = service.insert_entry(&name, &number)?;
    info!("event=menu_insert module=cli status=ok position={position}");
    writeln!(output, "Entry inserted at position {position}.")?;
    show_directory(service, output)
}

fn update_action<S: DirectoryStore>(
    service: &mut DirectoryService<S>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<(), ActionError> {
    let raw = prompt(input, output, "Enter the entry number to update: ")?;
    let position = parse_position(&raw).map_err(position_error)?;
    let current = service.get_entry(position)?;
    write!(output, "Current entry: {}", encode_entry(&current))?;

    let name = prompt(input, output, "Enter updated name: ")?;
    let number = prompt(input, output, "Enter updated phone number: ")?;
    service.update_entry(position, &name, &number)?;
    info!("event=menu_update module=cli status=ok position={position}");
    writeln!(output, "Updated successfully.")?;
    show_directory(service, output)
}

fn delete_action<S: DirectoryStore>(
    service: &mut DirectoryService<S>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<(), ActionError> {
    let raw = prompt(input, output, "Enter entry number to delete: ")?;
    let position = parse_position(&raw).map_err(position_error)?;

    service.delete_entry(position)?;
    info!("event=menu_delete module=cli status=ok position={position}");
    writeln!(output, "Entry deleted successfully.")?;
    show_directory(service, output)
}

fn position_error(err: InputError) -> ActionError {
    match err {
        InputError::NotANumber(raw) => ActionError::InvalidPosition(raw),
        other => ActionError::Input(other),
    }
}

fn show_directory<S: DirectoryStore>(
    service: &mut DirectoryService<S>,
    output: &mut impl Write,
) -> Result<(), ActionError> {
    let entries = service.list_entries()?;
    write!(output, "     {HEADER_LINE}")?;
    for (index, entry) in entries.iter().enumerate() {
        write!(output, "{:>3}. {}", index + 1, encode_entry(entry))?;
    }
    writeln!(output, "{} entries in directory.", entries.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run_session;
    use std::io::{self, Cursor, Write};
    use teldir_core::{open_store_at, DirectoryService, Entry, FileDirectoryStore, OpenMode};

    fn run(script: &str) -> (DirectoryService<FileDirectoryStore>, String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store =
            open_store_at(dir.path().join("telephone_directory.txt"), OpenMode::Truncate).unwrap();
        let mut service = DirectoryService::new(store);
        let mut input = Cursor::new(script.to_string());
        let mut output = Vec::new();

        run_session(&mut service, &mut input, &mut output).unwrap();
        (service, String::from_utf8(output).unwrap(), dir)
    }

    #[test]
    fn insert_insert_delete_then_exit() {
        let (mut service, output, _dir) =
            run("1\nAlice\n5551234\n1\nBob\n5555678\n3\n1\n4\n");

        assert_eq!(service.list_entries().unwrap(), vec![Entry::new("Bob", "5555678")]);
        assert!(output.contains("New entry #2"));
        assert!(output.contains("Entry deleted successfully."));
        assert!(output.contains("1 entries in directory."));
        assert!(output.ends_with("Exiting...\n"));
    }

    #[test]
    fn update_shows_current_entry_then_replaces_it() {
        let (mut service, output, _dir) = run("1\nAlice\n5551234\n2\n1\nAlicia\n5550000\n4\n");

        assert_eq!(service.list_entries().unwrap(), vec![Entry::new("Alicia", "5550000")]);
        assert!(output.contains("Current entry: Alice               5551234\n"));
        assert!(output.contains("Updated successfully."));
    }

    #[test]
    fn invalid_selectors_reprompt() {
        let (service, output, _dir) = run("9\nabc\n4\n");

        assert_eq!(output.matches("Invalid operation.").count(), 2);
        assert_eq!(output.matches("Enter your choice: ").count(), 3);
        assert_eq!(service.entry_count(), 0);
    }

    #[test]
    fn out_of_range_and_malformed_positions_are_reported() {
        let (service, output, _dir) = run("1\nAlice\n5551234\n3\n5\n2\nfirst\n4\n");

        assert!(output.contains("Error: position 5 is out of range: expected 1..=1"));
        assert!(output.contains("Error: `first` is not a valid entry number"));
        assert_eq!(service.entry_count(), 1);
        assert_eq!(service.deletes_performed(), 0);
    }

    #[test]
    fn end_of_input_exits_mid_action() {
        let (service, output, _dir) = run("1\nAlice\n");

        assert!(output.ends_with("Exiting...\n"));
        assert_eq!(service.entry_count(), 0);
    }

    struct UnflushableOutput(Vec<u8>);

    impl Write for UnflushableOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write(buf)
        }

        // Prompts flush fine; only the goodbye flush fails.
        fn flush(&mut self) -> io::Result<()> {
            if self.0.ends_with(b"Exiting...\n") {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
            }
            Ok(())
        }
    }

    #[test]
    fn failed_final_flush_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            open_store_at(dir.path().join("telephone_directory.txt"), OpenMode::Truncate).unwrap();
        let mut service = DirectoryService::new(store);
        let mut input = Cursor::new("4\n".to_string());
        let mut output = UnflushableOutput(Vec::new());

        let err = run_session(&mut service, &mut input, &mut output).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(output.0.ends_with(b"Exiting...\n"));
    }

    #[test]
    fn blank_name_is_rejected_and_session_continues() {
        let (service, output, _dir) = run("1\n\n5551234\n4\n");

        assert!(output.contains("Error: name cannot be empty"));
        assert_eq!(service.entry_count(), 0);
    }
}
