//! Core contracts for submission validation.
//!
//! This crate defines the canonical property table produced by the schema
//! dialect adapters, the tri-state flags used by the validation rules, and the
//! per-commons configuration shared by the CLI and the rule engine.

pub mod commons;
pub mod error;
pub mod property;
pub mod table;
pub mod types;
pub mod validation;

pub use commons::{CommonsConfig, CommonsFeatures, DEFAULT_DELIMITER};
pub use error::{Error, Result};
pub use property::{SchemaProperty, Tristate};
pub use table::{PropertyTable, table_json_schema};
pub use types::{PropertyType, ScalarKind, ValueKind};
pub use validation::validate_properties;

/// Contract version for exported property tables.
pub const PROPERTY_TABLE_VERSION: &str = "0.1";
