//! # Strata Core
//!
//! Shared error types and result aliases for the Strata cache layer.

pub mod error;
pub mod result;

pub use error::CacheError;
pub use result::CacheResult;
