use tscns_domain::DriftSample;

/// Port for sampling how far the fast clock sits from the system clock.
pub trait DriftProbePort: Send + Sync {
    fn probe(&self) -> DriftSample;
}
