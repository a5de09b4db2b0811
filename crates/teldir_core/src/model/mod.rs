//! Directory domain model.
//!
//! # Responsibility
//! - Define the single record shape stored in the directory file.
//!
//! # Invariants
//! - Entries have no identity of their own; position is the only address.

pub mod entry;
