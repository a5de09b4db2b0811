//! Interactive telephone directory.
//!
//! # Responsibility
//! - Bootstrap logging and the directory file, then hand over to the menu.
//! - Map startup failure to exit code 1.

mod input;
mod session;

use log::error;
use std::io;
use std::process::ExitCode;
use teldir_core::{init_logging, open_store, DirectoryConfig, DirectoryService};

fn main() -> ExitCode {
    let config = DirectoryConfig::default();

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let store = match open_store(&config) {
        Ok(store) => store,
        Err(err) => {
            println!("Unable to create the file: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut service = DirectoryService::new(store);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    match session::run_session(&mut service, &mut input, &mut output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=session_end module=cli status=error error={err}");
            eprintln!("terminal I/O failed: {err}");
            ExitCode::FAILURE
        }
    }
}
