//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - request filters and returned parameter values (`QueryFilter`, `ParamValue`)
//! - the nested metadata report (`OptionsReport`) and its flat rows (`MetadataRecord`)
//! - cache behavior (`CachePolicy`, `SaveOutcome`)

pub mod types;

pub use types::*;
