//! Schema dialect adapters.
//!
//! Each dialect turns its own schema description into the canonical
//! [`PropertyTable`]; rule code never sees dialect structure.

pub mod adapter;
pub mod dictionary;
pub mod error;
pub mod fetch;
pub mod mdf;
pub mod source;

pub use adapter::{SchemaDialect, normalize};
pub use dictionary::DataDictionary;
pub use error::{ModelError, ModelResult};
pub use fetch::{DirectoryFetcher, SchemaFetcher};
pub use mdf::MdfDocuments;
pub use source::SchemaSource;

pub use submval_core::PropertyTable;
