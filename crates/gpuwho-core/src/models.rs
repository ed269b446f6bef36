use crate::fields::FieldValue;

/// One process's GPU usage as reported by nvidia-smi, flattened onto the
/// device that reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessUsage {
    /// Device identifier (the device's minor number), kept as reported.
    pub gpu: String,
    /// OS process id.
    pub pid: u32,
    /// Process executable name, when the report includes one.
    pub name: Option<String>,
    /// Process type as reported (`C` compute, `G` graphics).
    pub kind: Option<String>,
    /// GPU memory used by this process, in Mb.
    pub used_memory: FieldValue,
    /// The owning device's aggregate compute utilization, in percent.
    pub gpu_util: FieldValue,
    /// The owning device's aggregate memory utilization, in percent.
    pub memory_util: FieldValue,
}

/// A [`ProcessUsage`] augmented with the resolved OS username.
///
/// `user` is `None` when the process could not be inspected or exited
/// between telemetry collection and ownership resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRecord {
    pub usage: ProcessUsage,
    pub user: Option<String>,
}

/// Per-(device, user) totals across all joined records sharing that key.
///
/// Identity fields (pid, process name, row position) are intentionally
/// absent; they have no meaning after aggregation. Utilization columns are
/// plain sums and can exceed 100 when several processes share a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSummary {
    pub gpu: String,
    /// `None` groups all records whose owner could not be resolved.
    pub user: Option<String>,
    /// Summed used memory, Mb. Degraded source values are skipped.
    pub used_memory: u64,
    /// Summed gpu utilization, percent. Degraded source values are skipped.
    pub gpu_util: u64,
    /// Summed memory utilization, percent. Degraded source values are skipped.
    pub memory_util: u64,
}
