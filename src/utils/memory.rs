//! Process memory readings

use sysinfo::{Pid, System};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Resident memory of the current process in bytes
pub fn process_memory_bytes() -> Option<u64> {
    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();
    system.refresh_process(pid);
    system.process(pid).map(|p| p.memory())
}

/// Resident memory of the current process in GiB, rounded to two decimals
pub fn process_memory_gb() -> Option<f64> {
    process_memory_bytes().map(|bytes| (bytes as f64 / GIB * 100.0).round() / 100.0)
}
