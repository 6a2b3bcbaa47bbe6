use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tscns_application::ports::{CalibrationPort, DriftProbePort};
use tscns_domain::{Anchor, CalibrationOutcome, CalibrationReport, DriftSample};

pub fn updated_report() -> CalibrationOutcome {
    let anchor = Anchor::from_bracket(3_000, 3_010, 1_000);
    CalibrationOutcome::Updated(CalibrationReport {
        previous_ns_per_cycle: 1.0 / 3.0,
        ns_per_cycle: 1.0 / 3.0,
        ..CalibrationReport::new(&anchor, 12)
    })
}

pub struct MockCalibrationPort {
    outcome: Arc<Mutex<CalibrationOutcome>>,
    call_count: Arc<AtomicU64>,
}

impl MockCalibrationPort {
    pub fn new() -> Self {
        Self::with_outcome(CalibrationOutcome::NotDue)
    }

    pub fn with_outcome(outcome: CalibrationOutcome) -> Self {
        Self {
            outcome: Arc::new(Mutex::new(outcome)),
            call_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn set_outcome(&self, outcome: CalibrationOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl CalibrationPort for MockCalibrationPort {
    fn calibrate(&self) -> CalibrationOutcome {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.outcome.lock().unwrap()
    }

    fn frequency_ghz(&self) -> f64 {
        3.0
    }
}

pub struct MockDriftProbe {
    sample: Arc<Mutex<DriftSample>>,
    call_count: Arc<AtomicU64>,
}

impl MockDriftProbe {
    pub fn new() -> Self {
        Self::with_sample(DriftSample::new(100, 120, 130))
    }

    pub fn with_sample(sample: DriftSample) -> Self {
        Self {
            sample: Arc::new(Mutex::new(sample)),
            call_count: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl DriftProbePort for MockDriftProbe {
    fn probe(&self) -> DriftSample {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.sample.lock().unwrap()
    }
}
