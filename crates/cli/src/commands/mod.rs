pub mod freq;
pub mod latency;
pub mod monitor;
pub mod watch;
