//! Normalization of the vendor report tree into per-process usage records.

use gpuwho_core::error::{GpuWhoError, Result};
use gpuwho_core::fields::FieldValue;
use gpuwho_core::models::ProcessUsage;
use gpuwho_core::node::Node;
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Flatten a parsed nvidia-smi report into one [`ProcessUsage`] per
/// (device, process) pair.
///
/// Devices reporting no processes are skipped. Every device sequence and
/// per-device process sequence goes through [`Node::as_sequence`], so a
/// one-device (or one-process) report normalizes identically to its
/// list-shaped equivalent.
pub fn normalize(raw: &Node) -> Result<Vec<ProcessUsage>> {
    let log = raw
        .get("nvidia_smi_log")
        .ok_or_else(|| GpuWhoError::MalformedTelemetry("report has no nvidia_smi_log".into()))?;

    let mut usages = Vec::new();

    let gpus = match log.get("gpu") {
        Some(gpus) => gpus.as_sequence(),
        // A driver with zero devices is a valid empty system.
        None => Vec::new(),
    };

    for gpu in gpus {
        let device = required_text(gpu, "minor_number", "device")?;

        let processes = match gpu.get("processes") {
            Some(p) if !p.is_empty() => p,
            _ => {
                debug!("device {}: no processes, skipping", device);
                continue;
            }
        };
        let infos = match processes.get("process_info") {
            Some(infos) => infos.as_sequence(),
            None => continue,
        };

        let utilization = gpu.get("utilization").ok_or_else(|| {
            GpuWhoError::MalformedTelemetry(format!("device {} has no utilization block", device))
        })?;
        let gpu_util = FieldValue::parse(required_text(utilization, "gpu_util", "device")?);
        let memory_util = FieldValue::parse(required_text(utilization, "memory_util", "device")?);

        for info in infos {
            usages.push(normalize_process(
                info,
                device,
                gpu_util.clone(),
                memory_util.clone(),
            )?);
        }
    }

    debug!("normalized {} process records", usages.len());
    Ok(usages)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One process entry, with the owning device's fields attached.
fn normalize_process(
    info: &Node,
    device: &str,
    gpu_util: FieldValue,
    memory_util: FieldValue,
) -> Result<ProcessUsage> {
    let pid_text = required_text(info, "pid", "process")?;
    let pid: u32 = pid_text.trim().parse().map_err(|_| {
        GpuWhoError::MalformedTelemetry(format!("process pid \"{}\" is not an integer", pid_text))
    })?;

    let used_memory = FieldValue::parse(required_text(info, "used_memory", "process")?);

    Ok(ProcessUsage {
        gpu: device.to_string(),
        pid,
        name: optional_text(info, "process_name"),
        kind: optional_text(info, "type"),
        used_memory,
        gpu_util,
        memory_util,
    })
}

fn required_text<'a>(node: &'a Node, key: &str, record: &str) -> Result<&'a str> {
    node.get(key)
        .and_then(Node::as_text)
        .ok_or_else(|| GpuWhoError::MalformedTelemetry(format!("{} record has no {}", record, key)))
}

fn optional_text(node: &Node, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Node::as_text)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    fn map(entries: Vec<(&str, Node)>) -> Node {
        Node::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    fn process_info(pid: &str, used_memory: &str) -> Node {
        map(vec![
            ("pid", text(pid)),
            ("type", text("C")),
            ("process_name", text("python")),
            ("used_memory", text(used_memory)),
        ])
    }

    fn gpu(minor: &str, gpu_util: &str, memory_util: &str, processes: Node) -> Node {
        map(vec![
            ("minor_number", text(minor)),
            (
                "utilization",
                map(vec![
                    ("gpu_util", text(gpu_util)),
                    ("memory_util", text(memory_util)),
                ]),
            ),
            ("processes", processes),
        ])
    }

    fn report(gpus: Node) -> Node {
        map(vec![("nvidia_smi_log", map(vec![("gpu", gpus)]))])
    }

    // ── Shape coercion ────────────────────────────────────────────────────────

    #[test]
    fn test_singleton_device_and_list_device_normalize_identically() {
        let one = gpu(
            "0",
            "37 %",
            "12 %",
            map(vec![("process_info", process_info("100", "512 MiB"))]),
        );

        let bare = normalize(&report(one.clone())).unwrap();
        let listed = normalize(&report(Node::List(vec![one]))).unwrap();
        assert_eq!(bare, listed);
        assert_eq!(bare.len(), 1);
    }

    #[test]
    fn test_singleton_process_and_list_process_normalize_identically() {
        let info = process_info("100", "512 MiB");

        let bare = gpu(
            "0",
            "37 %",
            "12 %",
            map(vec![("process_info", info.clone())]),
        );
        let listed = gpu(
            "0",
            "37 %",
            "12 %",
            map(vec![("process_info", Node::List(vec![info]))]),
        );

        assert_eq!(
            normalize(&report(bare)).unwrap(),
            normalize(&report(listed)).unwrap()
        );
    }

    // ── Field extraction ──────────────────────────────────────────────────────

    #[test]
    fn test_device_fields_copied_onto_each_process() {
        let g = gpu(
            "3",
            "37 %",
            "12 %",
            map(vec![(
                "process_info",
                Node::List(vec![
                    process_info("100", "512 MiB"),
                    process_info("200", "1024 MiB"),
                ]),
            )]),
        );
        let usages = normalize(&report(g)).unwrap();

        assert_eq!(usages.len(), 2);
        for usage in &usages {
            assert_eq!(usage.gpu, "3");
            assert_eq!(usage.gpu_util, FieldValue::Amount(37));
            assert_eq!(usage.memory_util, FieldValue::Amount(12));
        }
        assert_eq!(usages[0].pid, 100);
        assert_eq!(usages[0].used_memory, FieldValue::Amount(512));
        assert_eq!(usages[1].pid, 200);
        assert_eq!(usages[1].used_memory, FieldValue::Amount(1024));
    }

    #[test]
    fn test_process_name_and_type_carried_through() {
        let g = gpu(
            "0",
            "0 %",
            "0 %",
            map(vec![("process_info", process_info("100", "512 MiB"))]),
        );
        let usages = normalize(&report(g)).unwrap();
        assert_eq!(usages[0].name.as_deref(), Some("python"));
        assert_eq!(usages[0].kind.as_deref(), Some("C"));
    }

    #[test]
    fn test_unparsable_used_memory_degrades() {
        let info = map(vec![("pid", text("100")), ("used_memory", text("N/A"))]);
        let g = gpu("0", "0 %", "0 %", map(vec![("process_info", info)]));
        let usages = normalize(&report(g)).unwrap();
        assert_eq!(usages[0].used_memory, FieldValue::Raw("N/A".to_string()));
    }

    #[test]
    fn test_unparsable_utilization_degrades() {
        let g = gpu(
            "0",
            "N/A",
            "N/A",
            map(vec![("process_info", process_info("100", "512 MiB"))]),
        );
        let usages = normalize(&report(g)).unwrap();
        assert_eq!(usages[0].gpu_util, FieldValue::Raw("N/A".to_string()));
    }

    // ── Skipping and empty systems ────────────────────────────────────────────

    #[test]
    fn test_idle_device_skipped() {
        // <processes></processes> parses to empty text.
        let idle = gpu("0", "0 %", "0 %", text(""));
        let busy = gpu(
            "1",
            "80 %",
            "40 %",
            map(vec![("process_info", process_info("100", "512 MiB"))]),
        );
        let usages = normalize(&report(Node::List(vec![idle, busy]))).unwrap();
        assert_eq!(usages.len(), 1);
        assert_eq!(usages[0].gpu, "1");
    }

    #[test]
    fn test_all_idle_yields_empty_vec() {
        let g = gpu("0", "0 %", "0 %", text(""));
        let usages = normalize(&report(g)).unwrap();
        assert!(usages.is_empty());
    }

    #[test]
    fn test_no_devices_yields_empty_vec() {
        let raw = map(vec![("nvidia_smi_log", map(vec![]))]);
        assert!(normalize(&raw).unwrap().is_empty());
    }

    // ── Malformed telemetry ───────────────────────────────────────────────────

    #[test]
    fn test_missing_log_root_fails() {
        let raw = map(vec![("something_else", text(""))]);
        assert!(matches!(
            normalize(&raw),
            Err(GpuWhoError::MalformedTelemetry(_))
        ));
    }

    #[test]
    fn test_missing_pid_fails() {
        let info = map(vec![("used_memory", text("512 MiB"))]);
        let g = gpu("0", "0 %", "0 %", map(vec![("process_info", info)]));
        assert!(matches!(
            normalize(&report(g)),
            Err(GpuWhoError::MalformedTelemetry(_))
        ));
    }

    #[test]
    fn test_non_numeric_pid_fails() {
        let info = map(vec![("pid", text("abc")), ("used_memory", text("1 MiB"))]);
        let g = gpu("0", "0 %", "0 %", map(vec![("process_info", info)]));
        assert!(matches!(
            normalize(&report(g)),
            Err(GpuWhoError::MalformedTelemetry(_))
        ));
    }

    #[test]
    fn test_missing_minor_number_fails() {
        let g = map(vec![(
            "processes",
            map(vec![("process_info", process_info("100", "512 MiB"))]),
        )]);
        assert!(matches!(
            normalize(&report(g)),
            Err(GpuWhoError::MalformedTelemetry(_))
        ));
    }

    #[test]
    fn test_missing_utilization_block_fails() {
        let g = map(vec![
            ("minor_number", text("0")),
            (
                "processes",
                map(vec![("process_info", process_info("100", "512 MiB"))]),
            ),
        ]);
        assert!(matches!(
            normalize(&report(g)),
            Err(GpuWhoError::MalformedTelemetry(_))
        ));
    }

    // ── End-to-end with the XML converter ─────────────────────────────────────

    #[test]
    fn test_normalize_parsed_report() {
        let xml = "\
            <nvidia_smi_log>\
              <gpu>\
                <minor_number>0</minor_number>\
                <utilization>\
                  <gpu_util>37 %</gpu_util>\
                  <memory_util>12 %</memory_util>\
                </utilization>\
                <processes>\
                  <process_info>\
                    <pid>100</pid>\
                    <type>C</type>\
                    <process_name>python</process_name>\
                    <used_memory>512 MiB</used_memory>\
                  </process_info>\
                  <process_info>\
                    <pid>200</pid>\
                    <type>G</type>\
                    <process_name>Xorg</process_name>\
                    <used_memory>64 MiB</used_memory>\
                  </process_info>\
                </processes>\
              </gpu>\
            </nvidia_smi_log>";
        let raw = crate::xml::parse(xml).unwrap();
        let usages = normalize(&raw).unwrap();

        assert_eq!(usages.len(), 2);
        assert_eq!(usages[0].pid, 100);
        assert_eq!(usages[0].used_memory, FieldValue::Amount(512));
        assert_eq!(usages[1].pid, 200);
        assert_eq!(usages[1].kind.as_deref(), Some("G"));
    }
}
