use crate::ports::{ClockSource, DriftProbePort};
use std::sync::Arc;
use tscns_domain::DriftSample;

/// Straddles one system-clock read between two fast-clock reads.
pub struct CheckDriftUseCase<K: ?Sized> {
    clock: Arc<K>,
}

impl<K: ClockSource + ?Sized> CheckDriftUseCase<K> {
    pub fn new(clock: Arc<K>) -> Self {
        Self { clock }
    }

    pub fn execute(&self) -> DriftSample {
        let before_ns = self.clock.rdns();
        let system_ns = self.clock.rdsysns();
        let after_ns = self.clock.rdns();
        DriftSample::new(before_ns, system_ns, after_ns)
    }
}

impl<K: ClockSource + ?Sized> DriftProbePort for CheckDriftUseCase<K> {
    fn probe(&self) -> DriftSample {
        self.execute()
    }
}
