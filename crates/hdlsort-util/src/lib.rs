//! Shared utilities for hdlsort.
//!
//! This crate provides cross-cutting concerns used by all other hdlsort crates:
//! error types, source tree walking with permissive decoding, shell command
//! spawning, and terminal status lines.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
