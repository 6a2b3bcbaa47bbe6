use tracing::{debug, warn};
use tscns_domain::DomainError;

/// Indices of the CPUs this process may run on.
pub fn available_cpus() -> Vec<usize> {
    core_affinity::get_core_ids()
        .unwrap_or_default()
        .into_iter()
        .map(|core| core.id)
        .collect()
}

/// Pin the calling thread to `cpu`.
///
/// Cycle counters are only guaranteed monotonic within one core, so the
/// thread that owns a clock should stay on the core it was calibrated on.
pub fn pin_current_thread(cpu: usize) -> Result<(), DomainError> {
    let core = core_affinity::get_core_ids()
        .unwrap_or_default()
        .into_iter()
        .find(|core| core.id == cpu)
        .ok_or_else(|| {
            DomainError::CpuAffinity(format!("CPU {} is not available to this process", cpu))
        })?;

    if !core_affinity::set_for_current(core) {
        warn!(cpu, "Failed to set thread affinity");
        return Err(DomainError::CpuAffinity(format!(
            "failed to pin thread to CPU {}",
            cpu
        )));
    }

    debug!(cpu, "Thread pinned");
    Ok(())
}
