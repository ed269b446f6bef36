//! Correlation and aggregation of usage records with process ownership.
//!
//! `join` is a left join by pid: every usage record survives whether or not
//! an owner was resolved. `aggregate` collapses the joined set into one row
//! per (device, user), with unattributable processes kept as their own
//! distinct group so usage by processes the caller may not inspect still
//! shows up in the report.

use std::collections::HashMap;

use gpuwho_core::error::{GpuWhoError, Result};
use gpuwho_core::models::{JoinedRecord, ProcessUsage, UsageSummary};
use tracing::debug;

// ── Join ──────────────────────────────────────────────────────────────────────

/// Attach resolved usernames to usage records by pid.
///
/// Total over any input pair: the output has exactly one record per usage
/// record, with `user: None` where the pid is absent from `owners`.
pub fn join(usages: Vec<ProcessUsage>, owners: &HashMap<u32, String>) -> Vec<JoinedRecord> {
    usages
        .into_iter()
        .map(|usage| {
            let user = owners.get(&usage.pid).cloned();
            JoinedRecord { usage, user }
        })
        .collect()
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

/// Collapse joined records into per-(device, user) totals.
///
/// Returns [`GpuWhoError::EmptyInput`] for an empty join; callers treat that
/// as "no GPU activity". Groups appear in first-seen order so output is
/// stable for a given input. Degraded (non-numeric) source values contribute
/// nothing to their column's sum.
pub fn aggregate(joined: &[JoinedRecord]) -> Result<Vec<UsageSummary>> {
    if joined.is_empty() {
        return Err(GpuWhoError::EmptyInput);
    }

    let mut index: HashMap<(String, Option<String>), usize> = HashMap::new();
    let mut summaries: Vec<UsageSummary> = Vec::new();

    for record in joined {
        let key = (record.usage.gpu.clone(), record.user.clone());
        let slot = *index.entry(key).or_insert_with(|| {
            summaries.push(UsageSummary {
                gpu: record.usage.gpu.clone(),
                user: record.user.clone(),
                used_memory: 0,
                gpu_util: 0,
                memory_util: 0,
            });
            summaries.len() - 1
        });
        add_record(&mut summaries[slot], record);
    }

    debug!(
        "aggregated {} records into {} (gpu, user) groups",
        joined.len(),
        summaries.len()
    );
    Ok(summaries)
}

/// Accumulate one record's numeric columns into its group's summary.
fn add_record(summary: &mut UsageSummary, record: &JoinedRecord) {
    if let Some(mb) = record.usage.used_memory.amount() {
        summary.used_memory += mb;
    }
    if let Some(pct) = record.usage.gpu_util.amount() {
        summary.gpu_util += pct;
    }
    if let Some(pct) = record.usage.memory_util.amount() {
        summary.memory_util += pct;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
