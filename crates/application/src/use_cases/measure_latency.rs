use crate::ports::ClockSource;
use std::hint::black_box;
use std::sync::Arc;
use tscns_domain::LatencyReport;

/// Amortized cost of `rdsysns`, `rdtsc` and `rdns`, timed against
/// `rdsysns` itself.
///
/// The reference clock is read once between loops, so its own cost is
/// subtracted from the two later loops. Measured in a tight loop the
/// `rdsysns` figure is a lower bound.
pub struct MeasureLatencyUseCase<K: ?Sized> {
    clock: Arc<K>,
}

impl<K: ClockSource + ?Sized> MeasureLatencyUseCase<K> {
    pub fn new(clock: Arc<K>) -> Self {
        Self { clock }
    }

    pub fn execute(&self, iterations: u64) -> LatencyReport {
        let n = iterations.max(1);
        let clock = &*self.clock;
        let mut sink = 0i64;

        let t0 = clock.rdsysns();
        for _ in 0..n {
            sink = sink.wrapping_add(clock.rdsysns());
        }
        let t1 = clock.rdsysns();
        for _ in 0..n {
            sink = sink.wrapping_add(clock.rdtsc());
        }
        let t2 = clock.rdsysns();
        for _ in 0..n {
            sink = sink.wrapping_add(clock.rdns());
        }
        let t3 = clock.rdsysns();
        black_box(sink);

        let rdsysns_ns = (t1 - t0) as f64 / (n + 1) as f64;
        LatencyReport {
            iterations: n,
            rdsysns_ns,
            rdtsc_ns: ((t2 - t1) as f64 - rdsysns_ns) / n as f64,
            rdns_ns: ((t3 - t2) as f64 - rdsysns_ns) / n as f64,
        }
    }
}
