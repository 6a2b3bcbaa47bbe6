use crate::ports::{CycleCounter, WallClock};
use tscns_domain::config::MAX_SYNC_TRIALS;
use tscns_domain::Anchor;

/// Pairs the cycle counter with the wall clock.
///
/// Each round reads `cycle, (wall, cycle) × N` so every wall-clock read is
/// bracketed by two counter reads, then keeps the narrowest bracket. The
/// Linux kernel takes the first trial under a fixed threshold; taking the
/// minimum over a few trials is tighter for the same cost.
pub struct TimeSampler<C, W> {
    counter: C,
    wall: W,
    trials: usize,
    coarse: bool,
}

impl<C: CycleCounter, W: WallClock> TimeSampler<C, W> {
    pub fn new(counter: C, wall: W, trials: usize, coarse: bool) -> Self {
        Self {
            counter,
            wall,
            trials: trials.clamp(1, MAX_SYNC_TRIALS),
            coarse,
        }
    }

    #[inline]
    pub fn counter(&self) -> &C {
        &self.counter
    }

    #[inline]
    pub fn wall_clock(&self) -> &W {
        &self.wall
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn sample(&self) -> Anchor {
        let n = self.trials;
        let mut cycles = [0i64; MAX_SYNC_TRIALS + 1];
        let mut walls = [0i64; MAX_SYNC_TRIALS];

        cycles[0] = self.counter.read_cycles();
        for i in 0..n {
            walls[i] = self.wall.now_ns();
            cycles[i + 1] = self.counter.read_cycles();
        }

        let (cycles, walls) = (&cycles[..=n], &walls[..n]);
        let best = if self.coarse {
            select_anchor_coarse(cycles, walls)
        } else {
            select_anchor(cycles, walls)
        };
        best.unwrap_or_else(|| Anchor::from_bracket(cycles[0], cycles[1], walls[0]))
    }
}

/// Narrowest bracket among `walls[i]` ⊂ `(cycles[i], cycles[i + 1])`.
///
/// Ties keep the earliest trial. `None` only when there is no complete
/// bracket.
pub fn select_anchor(cycles: &[i64], walls: &[i64]) -> Option<Anchor> {
    let n = walls.len().min(cycles.len().saturating_sub(1));
    (0..n)
        .map(|i| Anchor::from_bracket(cycles[i], cycles[i + 1], walls[i]))
        .reduce(|best, candidate| {
            if candidate.bracket_cycles < best.bracket_cycles {
                candidate
            } else {
                best
            }
        })
}

/// Bracket selection for clocks that only advance in coarse steps.
///
/// Repeated wall values are collapsed to the trial where the value first
/// changed, and brackets run between consecutive change points. The first
/// trial and the last change point are dropped since neither is known to
/// span a full tick. Falls back to [`select_anchor`] when the round saw
/// fewer than two changes.
pub fn select_anchor_coarse(cycles: &[i64], walls: &[i64]) -> Option<Anchor> {
    let n = walls.len().min(cycles.len().saturating_sub(1));
    let mut prev: Option<(i64, i64)> = None;
    let mut best: Option<Anchor> = None;

    for i in 1..n {
        if walls[i] == walls[i - 1] {
            continue;
        }
        let start = cycles[i];
        if let Some((lo, wall_ns)) = prev {
            let candidate = Anchor::from_bracket(lo, start, wall_ns);
            if best.map_or(true, |b| candidate.bracket_cycles < b.bracket_cycles) {
                best = Some(candidate);
            }
        }
        prev = Some((start, walls[i]));
    }

    best.or_else(|| select_anchor(cycles, walls))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    struct ScriptedCounter {
        values: Vec<i64>,
        next: AtomicUsize,
    }

    impl CycleCounter for ScriptedCounter {
        fn read_cycles(&self) -> i64 {
            let i = self.next.fetch_add(1, Ordering::Relaxed);
            self.values[i.min(self.values.len() - 1)]
        }
    }

    struct SteppingWall {
        now: AtomicI64,
        step: i64,
    }

    impl WallClock for SteppingWall {
        fn now_ns(&self) -> i64 {
            self.now.fetch_add(self.step, Ordering::Relaxed) + self.step
        }
    }

    #[test]
    fn test_selects_narrowest_bracket_midpoint() {
        let cycles = [0, 600, 1_200, 1_205, 1_900, 2_500];
        let walls = [10, 20, 30, 40, 50];

        let anchor = select_anchor(&cycles, &walls).unwrap();

        assert_eq!(anchor.bracket_cycles, 5);
        assert_eq!(anchor.cycles, 1_202);
        assert_eq!(anchor.wall_ns, 30);
    }

    #[test]
    fn test_ties_keep_earliest_trial() {
        let cycles = [0, 100, 200, 300];
        let walls = [7, 8, 9];

        let anchor = select_anchor(&cycles, &walls).unwrap();

        assert_eq!(anchor.wall_ns, 7);
        assert_eq!(anchor.cycles, 50);
    }

    #[test]
    fn test_empty_round_has_no_anchor() {
        assert!(select_anchor(&[42], &[]).is_none());
    }

    #[test]
    fn test_coarse_selection_collapses_repeated_walls() {
        let cycles = [0, 10, 20, 30, 40, 50, 60, 70, 80];
        let walls = [100, 100, 200, 200, 200, 300, 300, 400];

        let anchor = select_anchor_coarse(&cycles, &walls).unwrap();

        assert_eq!(anchor.wall_ns, 300);
        assert_eq!(anchor.cycles, 60);
        assert_eq!(anchor.bracket_cycles, 20);
    }

    #[test]
    fn test_coarse_selection_falls_back_without_changes() {
        let cycles = [0, 40, 45, 90];
        let walls = [500, 500, 500];

        let anchor = select_anchor_coarse(&cycles, &walls).unwrap();

        assert_eq!(anchor.bracket_cycles, 5);
        assert_eq!(anchor.cycles, 42);
    }

    #[test]
    fn test_sample_interleaves_reads() {
        let counter = ScriptedCounter {
            values: vec![1_000, 1_900, 1_905, 2_800],
            next: AtomicUsize::new(0),
        };
        let wall = SteppingWall {
            now: AtomicI64::new(0),
            step: 100,
        };
        let sampler = TimeSampler::new(counter, wall, 3, false);

        let anchor = sampler.sample();

        assert_eq!(anchor.cycles, 1_902);
        assert_eq!(anchor.wall_ns, 200);
    }

    #[test]
    fn test_trial_count_is_clamped() {
        let counter = ScriptedCounter {
            values: vec![0],
            next: AtomicUsize::new(0),
        };
        let wall = SteppingWall {
            now: AtomicI64::new(0),
            step: 1,
        };
        assert_eq!(TimeSampler::new(counter, wall, 99, false).trials(), MAX_SYNC_TRIALS);
    }
}
