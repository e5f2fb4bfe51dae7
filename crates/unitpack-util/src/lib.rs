//! Shared utilities for unitpack.
//!
//! This crate provides the cross-cutting error type used by every other
//! unitpack crate.

pub mod errors;
