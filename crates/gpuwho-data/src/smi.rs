//! nvidia-smi invocation.

use std::process::Command;

use gpuwho_core::error::{GpuWhoError, Result};
use gpuwho_core::node::Node;
use tracing::debug;

use crate::xml;

/// Run `nvidia-smi -q -x` and parse the XML report into a [`Node`] tree.
///
/// Any failure here is fatal: a missing executable, a non-zero exit, or an
/// empty/unparseable report all abort the run. No retries.
pub fn query() -> Result<Node> {
    let output = Command::new("nvidia-smi")
        .args(["-q", "-x"])
        .output()
        .map_err(|source| GpuWhoError::SmiLaunch { source })?;

    if !output.status.success() {
        return Err(GpuWhoError::SmiExit {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let report = String::from_utf8_lossy(&output.stdout);
    debug!("nvidia-smi report: {} bytes", report.len());
    xml::parse(&report)
}

#[cfg(test)]
mod tests {
    use super::*;

    // query() itself needs real hardware; the XML path it feeds is covered
    // in `xml::tests` and `normalize::tests`. What can be checked anywhere
    // is the launch-failure mapping.

    #[test]
    fn test_missing_executable_maps_to_launch_error() {
        let result = Command::new("gpuwho-no-such-binary-xyz")
            .output()
            .map_err(|source| GpuWhoError::SmiLaunch { source });
        match result {
            Err(GpuWhoError::SmiLaunch { .. }) => {}
            other => panic!("expected SmiLaunch, got {:?}", other.map(|_| ())),
        }
    }
}
