mod clock;
mod config;
mod logging;

pub use clock::build_clock;
pub use config::load_config;
pub use logging::init_logging;
