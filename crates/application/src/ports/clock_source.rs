/// Read surface of a calibrated fast clock.
pub trait ClockSource: Send + Sync {
    /// Raw cycle-counter value.
    fn rdtsc(&self) -> i64;

    /// Cycle-counter value converted to wall-clock nanoseconds.
    fn tsc2ns(&self, cycles: i64) -> i64;

    /// Current fast-clock time.
    fn rdns(&self) -> i64 {
        self.tsc2ns(self.rdtsc())
    }

    /// Current system-clock time, the fast clock's ground truth.
    fn rdsysns(&self) -> i64;

    /// Counter frequency implied by the published slope, in GHz.
    fn frequency_ghz(&self) -> f64;
}
