use tscns_application::ports::CycleCounter;

/// The core's free-running cycle counter.
///
/// `rdtsc` on x86_64, the virtual counter `cntvct_el0` on aarch64. Other
/// targets have no portable counter and read the realtime clock instead,
/// which keeps the calibration math valid at one nanosecond per "cycle".
#[derive(Debug, Default, Clone, Copy)]
pub struct TscCounter;

impl TscCounter {
    pub fn new() -> Self {
        Self
    }

    /// Whether reads come from a hardware counter rather than the fallback.
    pub const fn is_hardware() -> bool {
        cfg!(any(target_arch = "x86_64", target_arch = "aarch64"))
    }

    #[cfg(target_arch = "x86_64")]
    #[inline(always)]
    pub fn read() -> i64 {
        // SAFETY: rdtsc is available on every x86_64 CPU.
        unsafe { core::arch::x86_64::_rdtsc() as i64 }
    }

    #[cfg(target_arch = "aarch64")]
    #[inline(always)]
    pub fn read() -> i64 {
        let cycles: u64;
        // SAFETY: cntvct_el0 is readable from EL0 on every supported OS.
        unsafe {
            core::arch::asm!("mrs {}, cntvct_el0", out(reg) cycles, options(nomem, nostack));
        }
        cycles as i64
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    #[inline(always)]
    pub fn read() -> i64 {
        super::SystemClock::read()
    }
}

impl CycleCounter for TscCounter {
    #[inline(always)]
    fn read_cycles(&self) -> i64 {
        Self::read()
    }
}
