//! Core types shared by the nave crates
//!
//! This crate contains:
//! - The error taxonomy used across fetch, mask and upload
//! - Export file helpers (timestamped names, pretty JSON read/write)

pub mod error;
pub mod export;

pub use error::{Error, Result};
pub use export::{ExportKind, export_file_name, read_json, write_json};
