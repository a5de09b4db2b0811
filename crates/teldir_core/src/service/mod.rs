//! Directory use-case services.
//!
//! # Responsibility
//! - Turn raw user input into validated store calls.
//! - Keep the CLI decoupled from file storage details.

pub mod directory_service;
