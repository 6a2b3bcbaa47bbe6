use std::sync::Arc;

/// Source of raw cycle-counter values.
///
/// Values must be monotonically non-decreasing on the core that reads them.
/// Implementations sit on the hot path and must not allocate or lock.
pub trait CycleCounter: Send + Sync {
    fn read_cycles(&self) -> i64;
}

impl<T: CycleCounter + ?Sized> CycleCounter for Arc<T> {
    #[inline]
    fn read_cycles(&self) -> i64 {
        (**self).read_cycles()
    }
}
