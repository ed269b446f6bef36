//! Collection and correlation layer for gpuwho.
//!
//! Responsible for invoking nvidia-smi, converting its XML report into the
//! generic node tree, normalizing that tree into per-process usage records,
//! snapshotting process ownership, and joining/aggregating the results.

pub mod engine;
pub mod normalize;
pub mod owners;
pub mod smi;
pub mod xml;

pub use gpuwho_core as core;
