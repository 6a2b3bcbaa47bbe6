use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tscns_application::ports::{CycleCounter, WallClock};
use tscns_application::services::Tscns;
use tscns_domain::ClockConfig;

/// 2023-11-14T22:13:20Z
pub const T0: i64 = 1_700_000_000_000_000_000;

/// Virtual timeline shared by a simulated counter and wall clock.
///
/// Every read advances time by `tick_ns`, so busy-waits terminate and the
/// bracket around each wall read has a known, constant width. The counter
/// reads zero at `origin_ns` and ticks at `cycles_per_ns`.
pub struct SimTimeline {
    now_ns: AtomicI64,
    wall_offset_ns: AtomicI64,
    origin_ns: i64,
    cycles_per_ns: f64,
    tick_ns: i64,
}

impl SimTimeline {
    pub fn new(start_ns: i64, cycles_per_ns: f64, tick_ns: i64) -> Arc<Self> {
        Arc::new(Self {
            now_ns: AtomicI64::new(start_ns),
            wall_offset_ns: AtomicI64::new(0),
            origin_ns: start_ns,
            cycles_per_ns,
            tick_ns,
        })
    }

    pub fn now(&self) -> i64 {
        self.now_ns.load(Ordering::SeqCst)
    }

    pub fn advance(&self, ns: i64) {
        self.now_ns.fetch_add(ns, Ordering::SeqCst);
    }

    /// Step the wall clock without touching the counter, like an NTP step.
    pub fn step_wall(&self, ns: i64) {
        self.wall_offset_ns.fetch_add(ns, Ordering::SeqCst);
    }

    pub fn cycles_at(&self, ns: i64) -> i64 {
        ((ns - self.origin_ns) as f64 * self.cycles_per_ns) as i64
    }

    fn tick(&self) -> i64 {
        self.now_ns.fetch_add(self.tick_ns, Ordering::SeqCst)
    }
}

pub struct SimCounter(pub Arc<SimTimeline>);

impl CycleCounter for SimCounter {
    fn read_cycles(&self) -> i64 {
        let t = self.0.tick();
        self.0.cycles_at(t)
    }
}

pub struct SimWallClock(pub Arc<SimTimeline>);

impl WallClock for SimWallClock {
    fn now_ns(&self) -> i64 {
        self.0.tick() + self.0.wall_offset_ns.load(Ordering::SeqCst)
    }
}

/// A counter that never moves.
pub struct FrozenCounter;

impl CycleCounter for FrozenCounter {
    fn read_cycles(&self) -> i64 {
        42
    }
}

pub fn sim_clock(
    cycles_per_ns: f64,
    tick_ns: i64,
    config: ClockConfig,
) -> (Arc<SimTimeline>, Tscns<SimCounter, SimWallClock>) {
    let timeline = SimTimeline::new(T0, cycles_per_ns, tick_ns);
    let clock = Tscns::new(
        SimCounter(Arc::clone(&timeline)),
        SimWallClock(Arc::clone(&timeline)),
        config,
    )
    .unwrap();
    (timeline, clock)
}
