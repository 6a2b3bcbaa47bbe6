pub mod cycle_counter;
pub mod system_clock;

pub use cycle_counter::TscCounter;
pub use system_clock::SystemClock;
