use std::sync::Arc;

/// System (realtime) clock in nanoseconds since the Unix epoch.
pub trait WallClock: Send + Sync {
    fn now_ns(&self) -> i64;
}

impl<T: WallClock + ?Sized> WallClock for Arc<T> {
    #[inline]
    fn now_ns(&self) -> i64 {
        (**self).now_ns()
    }
}
