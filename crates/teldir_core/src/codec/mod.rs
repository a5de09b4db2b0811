//! On-disk representation of directory entries.
//!
//! # Responsibility
//! - Own the fixed-width line format and the header line.
//!
//! # Invariants
//! - `decode_line(encode_entry(e)) == e` for every valid entry.

pub mod record;
