//! Core domain types for gpuwho.
//!
//! Holds the generic telemetry node tree, the tolerant field-coercion rules,
//! the per-process / joined / summarized record types, the error enum and the
//! command-line settings. Contains no I/O; collection and presentation live
//! in the `gpuwho-data` and `gpuwho-ui` crates.

pub mod error;
pub mod fields;
pub mod models;
pub mod node;
pub mod settings;
