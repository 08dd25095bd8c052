//! # voisinage-core
//!
//! Core types, errors, and static tables for the voisinage item-sharing
//! libraries.
//!
//! This crate provides the foundational data structures that the inference
//! and geo crates depend on: the fixed category set, item and community
//! models, analysis results, the error taxonomy, and shared defaults.

pub mod cancel;
pub mod defaults;
pub mod error;
pub mod keywords;
pub mod models;

// Re-export commonly used types at crate root
pub use cancel::{cancellation_pair, CancelHandle, Cancellation};
pub use error::{Error, Result};
pub use keywords::{entry_for, CategoryKeywordEntry, CATEGORY_KEYWORDS};
pub use models::*;
