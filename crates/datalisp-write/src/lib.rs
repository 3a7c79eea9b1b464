//! DataLisp text writer.
//!
//! - `Writer`: emit a [`datalisp_model::Container`] as DataLisp source

mod writer;

pub use writer::{generate, generate_with, WriteError, WriteOptions, Writer};
