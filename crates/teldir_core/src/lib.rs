//! Core storage engine for the telephone directory.
//! Owns the record format, the record file and every mutation on it.

pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use codec::record::{decode_line, encode_entry, CodecError, HEADER_LINE};
pub use config::{DirectoryConfig, DEFAULT_DIRECTORY_FILE};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{Entry, EntryValidationError, NAME_MAX_CHARS, NUMBER_MAX_CHARS};
pub use service::directory_service::DirectoryService;
pub use store::{
    open_store, open_store_at, DirectoryStore, FileDirectoryStore, OpenMode, Position,
    SessionCounters, StoreError, StoreResult,
};
