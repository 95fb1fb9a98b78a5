//! QuickCut Core - Foundation types for the clip editor
//!
//! This crate provides the fundamental types used throughout QuickCut:
//! - Time representation (Seconds, TimeSpan)
//! - Shared error types

pub mod error;
pub mod time;

pub use error::{QuickCutError, Result};
pub use time::{Seconds, TimeSpan};
