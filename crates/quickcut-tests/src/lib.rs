//! Integration test crate for QuickCut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the engine and media crates to verify they work together.

#[cfg(test)]
mod arrange;

#[cfg(test)]
mod render;
