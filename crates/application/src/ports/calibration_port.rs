use tscns_domain::CalibrationOutcome;

/// Port for the periodic drift correction of a fast clock.
pub trait CalibrationPort: Send + Sync {
    /// Re-synchronize if the calibration interval has elapsed; cheap otherwise.
    fn calibrate(&self) -> CalibrationOutcome;

    fn frequency_ghz(&self) -> f64;
}
