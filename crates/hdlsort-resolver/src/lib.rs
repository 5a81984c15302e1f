//! Resolution and ordering engine: the unit corpus with library-aware
//! instance lookup and top-level closure, the file leveler that turns the
//! corpus into a build order, and the diagnostics stream both report into.

pub mod corpus;
pub mod diagnostics;
pub mod leveler;
