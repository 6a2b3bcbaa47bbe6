use std::sync::atomic::{fence, AtomicI64, AtomicU32, AtomicU64, Ordering};
use tscns_domain::ClockParameters;

/// Seqlock-published clock parameters: one writer, any number of lock-free
/// readers, no torn reads.
///
/// The writer bumps `seq` to odd, stores the fields, then bumps it back to
/// even. A reader snapshots `seq` with the low bit cleared, loads the fields
/// and re-reads `seq`; any overlap with a write makes the two values differ
/// and the read is retried.
///
/// Fields are atomics so that a racing read is a retry, never undefined
/// behaviour.
// align(64) keeps seq and the three fields on one cache line, away from
// whatever the owner places next to the store.
#[repr(align(64))]
pub struct ParameterStore {
    seq: AtomicU32,
    base_cycles: AtomicI64,
    base_ns: AtomicI64,
    ns_per_cycle: AtomicU64,
}

impl ParameterStore {
    pub fn new(params: ClockParameters) -> Self {
        Self {
            seq: AtomicU32::new(0),
            base_cycles: AtomicI64::new(params.base_cycles),
            base_ns: AtomicI64::new(params.base_ns),
            ns_per_cycle: AtomicU64::new(params.ns_per_cycle.to_bits()),
        }
    }

    /// Replace the published pair.
    ///
    /// Callers must serialize publishes; the protocol tolerates only one
    /// writer at a time.
    pub fn publish(&self, params: ClockParameters) {
        let seq = self.seq.load(Ordering::Relaxed);
        self.seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        self.base_cycles
            .store(params.base_cycles, Ordering::Relaxed);
        self.base_ns.store(params.base_ns, Ordering::Relaxed);
        self.ns_per_cycle
            .store(params.ns_per_cycle.to_bits(), Ordering::Relaxed);

        self.seq.store(seq.wrapping_add(2), Ordering::Release);
    }

    #[inline]
    pub fn load(&self) -> ClockParameters {
        loop {
            let before = self.seq.load(Ordering::Acquire) & !1;

            let params = ClockParameters {
                base_cycles: self.base_cycles.load(Ordering::Relaxed),
                base_ns: self.base_ns.load(Ordering::Relaxed),
                ns_per_cycle: f64::from_bits(self.ns_per_cycle.load(Ordering::Relaxed)),
            };

            fence(Ordering::Acquire);
            let after = self.seq.load(Ordering::Relaxed);
            if before == after {
                return params;
            }
            std::hint::spin_loop();
        }
    }

    #[inline]
    pub fn convert(&self, cycles: i64) -> i64 {
        self.load().convert(cycles)
    }

    /// Number of completed publishes times two (odd while one is in flight).
    pub fn sequence(&self) -> u32 {
        self.seq.load(Ordering::Acquire)
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ClockParameters::default())
    }
}
