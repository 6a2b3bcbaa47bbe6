pub mod parameter_store;
pub mod time_sampler;
pub mod tscns;

pub use parameter_store::ParameterStore;
pub use time_sampler::{select_anchor, select_anchor_coarse, TimeSampler};
pub use tscns::Tscns;
