//! Core data types for unitpack.
//!
//! This crate defines the values the packaging engine works on: artifacts and
//! their conflict identities, dependency scopes, packaging kinds, the
//! resolution trace handed over by the external dependency resolver, the
//! listener contract that trace is replayed through, and global configuration.
//!
//! This crate is intentionally free of graph logic and network I/O.

pub mod artifact;
pub mod config;
pub mod listener;
pub mod packaging;
pub mod trace;
