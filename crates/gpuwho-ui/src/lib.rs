//! Presentation layer for gpuwho.
//!
//! Renders the per-process and per-(gpu, user) record sequences as bordered
//! text tables on stdout.

pub mod table;
