use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};
use tracing::{debug, info, warn};
use tscns_domain::{
    CalibrationOutcome, CalibrationReport, CalibrationState, ClockConfig, ClockParameters,
    DomainError, SkipReason,
};

use crate::ports::{CalibrationPort, ClockSource, CycleCounter, WallClock};
use crate::services::{ParameterStore, TimeSampler};

/// Calibrations are scheduled this much early so an owner polling at
/// exactly the interval does not slip a whole period.
const SCHEDULE_LEAD_NS: i64 = 1_000;

/// Calibration is never due before `init`.
const NEVER: i64 = i64::MAX;

struct WriterState {
    last_measured_wall_ns: i64,
    last_observed_error_ns: i64,
    calibration_interval_ns: i64,
}

/// Cycle-counter clock that reads wall-clock nanoseconds without a syscall.
///
/// One `Tscns` belongs to one counter domain (normally one core, or a set of
/// cores whose counters were verified to be synchronized). Readers call
/// [`rdns`](Self::rdns) / [`tsc2ns`](Self::tsc2ns) from any thread without
/// locking; the owner calls [`calibrate`](Self::calibrate) regularly to
/// steer the slope against the system clock.
///
/// Calibration corrects the *rate* only: every update is anchored at the
/// value the clock was already showing, so readers never see it jump.
pub struct Tscns<C, W> {
    store: ParameterStore,
    next_calibration_due_at: AtomicI64,
    writer: Mutex<WriterState>,
    sampler: TimeSampler<C, W>,
    config: ClockConfig,
}

impl<C: CycleCounter, W: WallClock> Tscns<C, W> {
    /// Uninitialized clock: identity parameters, calibration never due.
    pub fn new(counter: C, wall: W, config: ClockConfig) -> Result<Self, DomainError> {
        config
            .validate()
            .map_err(|e| DomainError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            store: ParameterStore::default(),
            next_calibration_due_at: AtomicI64::new(NEVER),
            writer: Mutex::new(WriterState {
                last_measured_wall_ns: 0,
                last_observed_error_ns: 0,
                calibration_interval_ns: config.calibrate_interval_ns,
            }),
            sampler: TimeSampler::new(counter, wall, config.sync_trials, config.coarse_wall_clock),
            config,
        })
    }

    pub fn bootstrap(counter: C, wall: W, config: ClockConfig) -> Result<Self, DomainError> {
        let clock = Self::new(counter, wall, config)?;
        clock.init()?;
        Ok(clock)
    }

    /// Measure the counter frequency over the warm-up window and publish
    /// the first parameters. Returns the measured frequency in GHz.
    ///
    /// Spins (yielding) for `init_calibrate_ns` of wall time. Calling it
    /// again discards all drift history and re-synchronizes from scratch.
    pub fn init(&self) -> Result<f64, DomainError> {
        let mut writer = self.lock_writer();

        let base = self.sampler.sample();
        let expire_ns = base.wall_ns.saturating_add(self.config.init_calibrate_ns);
        while self.sampler.wall_clock().now_ns() < expire_ns {
            std::thread::yield_now();
        }
        let delayed = self.sampler.sample();

        let elapsed_cycles = delayed.cycles - base.cycles;
        let elapsed_ns = delayed.wall_ns - base.wall_ns;
        let ns_per_cycle = elapsed_ns as f64 / elapsed_cycles as f64;
        if elapsed_cycles <= 0 || !is_usable_slope(ns_per_cycle) {
            return Err(DomainError::DegenerateInterval {
                elapsed_cycles,
                elapsed_ns,
            });
        }

        self.save_params(
            &mut writer,
            delayed.cycles,
            delayed.wall_ns,
            delayed.wall_ns,
            ns_per_cycle,
        );

        let ghz = 1.0 / ns_per_cycle;
        info!(
            tsc_ghz = ghz,
            elapsed_ns,
            elapsed_cycles,
            interval_ns = writer.calibration_interval_ns,
            "Clock bootstrapped"
        );
        Ok(ghz)
    }

    /// Bootstrap from a known counter frequency, skipping the warm-up.
    pub fn init_with_frequency(&self, ghz: f64) -> Result<(), DomainError> {
        if !is_usable_slope(ghz) {
            return Err(DomainError::InvalidFrequency(format!(
                "{} GHz is not a positive finite frequency",
                ghz
            )));
        }

        let mut writer = self.lock_writer();
        let anchor = self.sampler.sample();
        self.save_params(
            &mut writer,
            anchor.cycles,
            anchor.wall_ns,
            anchor.wall_ns,
            1.0 / ghz,
        );

        info!(tsc_ghz = ghz, "Clock bootstrapped from known frequency");
        Ok(())
    }

    /// Correct the slope if the calibration interval has elapsed.
    ///
    /// Not due: one counter read and one atomic load. Due: take a fresh
    /// anchor, measure the error the published parameters show against the
    /// system clock, extrapolate it linearly to the next calibration and
    /// pick the slope that cancels it. The new parameters are anchored at
    /// the value the old ones predicted, so the exposed time is continuous.
    pub fn calibrate(&self) -> CalibrationOutcome {
        let now = self.sampler.counter().read_cycles();
        if now < self.next_calibration_due_at.load(Ordering::Relaxed) {
            return CalibrationOutcome::NotDue;
        }

        let mut writer = match self.writer.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return CalibrationOutcome::Busy,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
        };
        // Another caller may have calibrated between the check and the lock.
        if now < self.next_calibration_due_at.load(Ordering::Relaxed) {
            return CalibrationOutcome::NotDue;
        }

        let anchor = self.sampler.sample();
        let current = self.store.load();
        let predicted_ns = current.convert(anchor.cycles);
        let observed_error_ns = predicted_ns - anchor.wall_ns;
        let interval_ns = writer.calibration_interval_ns;

        let elapsed_ns = anchor.wall_ns - writer.last_measured_wall_ns;
        if elapsed_ns <= 0 {
            return self.skip(anchor.cycles, &current, interval_ns, SkipReason::NoElapsedTime);
        }

        let error_rate = (observed_error_ns - writer.last_observed_error_ns) as f64 / elapsed_ns as f64;
        let mut predicted_next_error = observed_error_ns as f64 + error_rate * interval_ns as f64;

        let limit = self.config.max_correction_ratio * interval_ns as f64;
        let clamped = predicted_next_error.abs() > limit;
        if clamped {
            warn!(
                predicted_next_error_ns = predicted_next_error as i64,
                limit_ns = limit as i64,
                elapsed_ns,
                "Predicted drift exceeds correction limit, clamping"
            );
            predicted_next_error = predicted_next_error.clamp(-limit, limit);
        }

        let ns_per_cycle = current.ns_per_cycle * (1.0 - predicted_next_error / interval_ns as f64);
        if !is_usable_slope(ns_per_cycle) {
            return self.skip(anchor.cycles, &current, interval_ns, SkipReason::InvalidSlope);
        }

        self.save_params(
            &mut writer,
            anchor.cycles,
            predicted_ns,
            anchor.wall_ns,
            ns_per_cycle,
        );

        let report = CalibrationReport {
            predicted_next_error_ns: predicted_next_error as i64,
            clamped,
            previous_ns_per_cycle: current.ns_per_cycle,
            ns_per_cycle,
            ..CalibrationReport::new(&anchor, observed_error_ns)
        };
        debug!(
            observed_error_ns,
            predicted_next_error_ns = report.predicted_next_error_ns,
            elapsed_ns,
            tsc_ghz = report.frequency_ghz(),
            bracket_cycles = anchor.bracket_cycles,
            "Clock calibrated"
        );
        CalibrationOutcome::Updated(report)
    }

    #[inline]
    pub fn tsc2ns(&self, cycles: i64) -> i64 {
        self.store.convert(cycles)
    }

    #[inline]
    pub fn rdtsc(&self) -> i64 {
        self.sampler.counter().read_cycles()
    }

    #[inline]
    pub fn rdns(&self) -> i64 {
        self.tsc2ns(self.rdtsc())
    }

    #[inline]
    pub fn rdsysns(&self) -> i64 {
        self.sampler.wall_clock().now_ns()
    }

    /// Inverse of the published slope, in cycles per nanosecond.
    pub fn frequency_ghz(&self) -> f64 {
        self.store.load().frequency_ghz()
    }

    pub fn parameters(&self) -> ClockParameters {
        self.store.load()
    }

    /// Snapshot of the calibrator's bookkeeping. Briefly takes the writer
    /// lock; not meant for hot paths.
    pub fn calibration_state(&self) -> CalibrationState {
        let writer = self.lock_writer();
        CalibrationState {
            last_measured_wall_ns: writer.last_measured_wall_ns,
            last_observed_error_ns: writer.last_observed_error_ns,
            next_calibration_due_at: self.next_calibration_due_at.load(Ordering::Relaxed),
            calibration_interval_ns: writer.calibration_interval_ns,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.next_calibration_due_at.load(Ordering::Relaxed) != NEVER
    }

    fn lock_writer(&self) -> MutexGuard<'_, WriterState> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save_params(
        &self,
        writer: &mut WriterState,
        base_cycles: i64,
        base_ns: i64,
        sys_ns: i64,
        ns_per_cycle: f64,
    ) {
        writer.last_observed_error_ns = base_ns - sys_ns;
        writer.last_measured_wall_ns = sys_ns;
        self.store
            .publish(ClockParameters::new(base_cycles, base_ns, ns_per_cycle));
        self.schedule_next(base_cycles, ns_per_cycle, writer.calibration_interval_ns);
    }

    fn schedule_next(&self, from_cycles: i64, ns_per_cycle: f64, interval_ns: i64) {
        let ahead = ((interval_ns - SCHEDULE_LEAD_NS) as f64 / ns_per_cycle) as i64;
        self.next_calibration_due_at
            .store(from_cycles.saturating_add(ahead), Ordering::Relaxed);
    }

    fn skip(
        &self,
        at_cycles: i64,
        current: &ClockParameters,
        interval_ns: i64,
        reason: SkipReason,
    ) -> CalibrationOutcome {
        warn!(%reason, "Calibration skipped, keeping previous parameters");
        self.schedule_next(at_cycles, current.ns_per_cycle, interval_ns);
        CalibrationOutcome::Skipped { reason }
    }
}

#[inline]
fn is_usable_slope(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl<C: CycleCounter, W: WallClock> ClockSource for Tscns<C, W> {
    #[inline]
    fn rdtsc(&self) -> i64 {
        Tscns::rdtsc(self)
    }

    #[inline]
    fn tsc2ns(&self, cycles: i64) -> i64 {
        Tscns::tsc2ns(self, cycles)
    }

    #[inline]
    fn rdns(&self) -> i64 {
        Tscns::rdns(self)
    }

    #[inline]
    fn rdsysns(&self) -> i64 {
        Tscns::rdsysns(self)
    }

    fn frequency_ghz(&self) -> f64 {
        Tscns::frequency_ghz(self)
    }
}

impl<C: CycleCounter, W: WallClock> CalibrationPort for Tscns<C, W> {
    fn calibrate(&self) -> CalibrationOutcome {
        Tscns::calibrate(self)
    }

    fn frequency_ghz(&self) -> f64 {
        Tscns::frequency_ghz(self)
    }
}
