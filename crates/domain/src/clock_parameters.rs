use serde::{Deserialize, Serialize};

/// Linear mapping from cycle-counter values to wall-clock nanoseconds,
/// anchored at the cycle value it was last calibrated against.
///
/// `ns = base_ns + (cycles - base_cycles) * ns_per_cycle`
///
/// Keeping the anchor instead of a bare offset keeps the floating-point
/// product proportional to the cycles elapsed since calibration, not to the
/// absolute counter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockParameters {
    pub base_cycles: i64,
    pub base_ns: i64,
    pub ns_per_cycle: f64,
}

impl ClockParameters {
    pub fn new(base_cycles: i64, base_ns: i64, ns_per_cycle: f64) -> Self {
        Self {
            base_cycles,
            base_ns,
            ns_per_cycle,
        }
    }

    /// Total over `i64`: results saturate at the ends of the range instead
    /// of wrapping, so the mapping stays monotonic for a positive slope.
    #[inline]
    pub fn convert(&self, cycles: i64) -> i64 {
        let delta = cycles.saturating_sub(self.base_cycles);
        self.base_ns.saturating_add((delta as f64 * self.ns_per_cycle) as i64)
    }

    /// Nanoseconds at cycle value zero.
    pub fn offset_ns(&self) -> i64 {
        self.convert(0)
    }

    /// Counter frequency in cycles per nanosecond (GHz).
    pub fn frequency_ghz(&self) -> f64 {
        1.0 / self.ns_per_cycle
    }

    /// Bitwise equality, so that `NaN` slopes and `-0.0` compare the way
    /// they were stored.
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.base_cycles == other.base_cycles
            && self.base_ns == other.base_ns
            && self.ns_per_cycle.to_bits() == other.ns_per_cycle.to_bits()
    }
}

impl Default for ClockParameters {
    /// Identity mapping: slope 1, offset 0.
    fn default() -> Self {
        Self {
            base_cycles: 0,
            base_ns: 0,
            ns_per_cycle: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let params = ClockParameters::default();
        assert_eq!(params.convert(0), 0);
        assert_eq!(params.convert(123_456), 123_456);
        assert_eq!(params.offset_ns(), 0);
        assert_eq!(params.frequency_ghz(), 1.0);
    }

    #[test]
    fn test_convert_is_anchored_at_base() {
        let params = ClockParameters::new(3_000, 1_700_000_000_000_000_000, 0.25);
        assert_eq!(params.convert(3_000), 1_700_000_000_000_000_000);
        assert_eq!(params.convert(3_000 + 4_000_000_000), 1_700_000_001_000_000_000);
        assert_eq!(params.convert(2_000), 1_699_999_999_999_999_750);
    }

    #[test]
    fn test_offset_matches_convert_at_zero() {
        let params = ClockParameters::new(6_000_000, 10_000_000, 0.5);
        assert_eq!(params.offset_ns(), 7_000_000);
        assert_eq!(params.convert(0), params.offset_ns());
    }

    #[test]
    fn test_convert_is_monotonic_around_base() {
        let params = ClockParameters::new(1_000, 5_000, 0.3333);
        let mut last = i64::MIN;
        for cycles in 900..1_100 {
            let ns = params.convert(cycles);
            assert!(ns >= last, "{} < {} at cycle {}", ns, last, cycles);
            last = ns;
        }
    }

    #[test]
    fn test_convert_saturates_at_top_of_range() {
        let now_ns = 1_700_000_000_000_000_000;
        let params = ClockParameters::new(now_ns, now_ns, 1.0);
        assert_eq!(params.convert(i64::MAX), i64::MAX);

        let slow_counter = ClockParameters::new(0, now_ns, 41.666);
        assert_eq!(slow_counter.convert(1_000_000_000_000_000_000), i64::MAX);
    }

    #[test]
    fn test_convert_is_monotonic_across_whole_range() {
        let params = ClockParameters::new(1_000, 1_700_000_000_000_000_000, 0.333);
        let points = [i64::MIN, i64::MIN / 2, -1, 0, 1_000, i64::MAX / 2, i64::MAX];
        for pair in points.windows(2) {
            assert!(
                params.convert(pair[0]) <= params.convert(pair[1]),
                "convert({}) > convert({})",
                pair[0],
                pair[1]
            );
        }
        assert!(params.convert(i64::MIN) <= params.convert(0));
    }
}
