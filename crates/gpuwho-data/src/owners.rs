//! Best-effort snapshot of process ownership.

use std::collections::HashMap;

use sysinfo::{ProcessesToUpdate, System, Users};
use tracing::debug;

/// Build a pid → username map for every process the caller may inspect.
///
/// Processes whose owner cannot be determined (permission denied, or the
/// process vanished mid-enumeration) are silently omitted; without elevated
/// privileges the map will legitimately miss other users' processes. This is
/// a snapshot of a live system, taken once, and is never an error.
pub fn resolve() -> HashMap<u32, String> {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);
    let users = Users::new_with_refreshed_list();

    let mut owners = HashMap::new();
    for (pid, process) in system.processes() {
        let Some(uid) = process.user_id() else {
            continue;
        };
        let Some(user) = users.get_user_by_id(uid) else {
            continue;
        };
        owners.insert(pid.as_u32(), user.name().to_string());
    }

    debug!(
        "resolved owners for {} of {} processes",
        owners.len(),
        system.processes().len()
    );
    owners
}
