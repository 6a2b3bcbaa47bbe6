pub mod affinity;

pub use affinity::{available_cpus, pin_current_thread};
