//! Bordered table rendering for the final report.

use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::Table;
use gpuwho_core::models::{JoinedRecord, UsageSummary};

/// Sentinel shown for a process whose owner could not be resolved.
const UNRESOLVED_USER: &str = "-";

// ── Public API ────────────────────────────────────────────────────────────────

/// One row per process (verbose mode). An empty record set renders as a
/// header-only table, never an error.
pub fn process_table(records: &[JoinedRecord]) -> Table {
    let mut table = new_table(vec![
        "gpu",
        "pid",
        "type",
        "process_name",
        "used_memory (Mb)",
        "gpu_util (%)",
        "memory_util (%)",
        "user",
    ]);

    for record in records {
        table.add_row(vec![
            record.usage.gpu.clone(),
            record.usage.pid.to_string(),
            record.usage.kind.clone().unwrap_or_default(),
            record.usage.name.clone().unwrap_or_default(),
            record.usage.used_memory.to_string(),
            record.usage.gpu_util.to_string(),
            record.usage.memory_util.to_string(),
            display_user(record.user.as_deref()),
        ]);
    }
    table
}

/// One row per (gpu, user) group (default mode).
pub fn summary_table(summaries: &[UsageSummary]) -> Table {
    let mut table = new_table(vec![
        "gpu",
        "user",
        "used_memory (Mb)",
        "gpu_util (%)",
        "memory_util (%)",
    ]);

    for summary in summaries {
        table.add_row(vec![
            summary.gpu.clone(),
            display_user(summary.user.as_deref()),
            summary.used_memory.to_string(),
            summary.gpu_util.to_string(),
            summary.memory_util.to_string(),
        ]);
    }
    table
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    // Content-width columns, no row or column truncation.
    table.load_preset(ASCII_FULL_CONDENSED);
    table.set_header(header);
    table
}

fn display_user(user: Option<&str>) -> String {
    user.unwrap_or(UNRESOLVED_USER).to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
