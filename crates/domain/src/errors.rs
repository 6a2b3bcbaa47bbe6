use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Degenerate calibration interval: {elapsed_cycles} cycles over {elapsed_ns} ns")]
    DegenerateInterval { elapsed_cycles: i64, elapsed_ns: i64 },

    #[error("Invalid counter frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid clock configuration: {0}")]
    InvalidConfig(String),

    #[error("CPU affinity error: {0}")]
    CpuAffinity(String),
}
