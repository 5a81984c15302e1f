//! Core data types for hdlsort.
//!
//! This crate holds everything that works on a single source file: the line
//! lexer, the design-unit model, the unit extractor state machine, the
//! instantiation extractor, binding requests, project configuration and
//! output format templates.
//!
//! This crate is intentionally free of graph code; resolution and ordering
//! live in `hdlsort-resolver`.

pub mod binding;
pub mod config;
pub mod instance;
pub mod lexer;
pub mod reader;
pub mod template;
pub mod token;
pub mod unit;
