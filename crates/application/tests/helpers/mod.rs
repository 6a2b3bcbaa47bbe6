#![allow(dead_code)]

mod sim_clock;

pub use sim_clock::{sim_clock, FrozenCounter, SimCounter, SimTimeline, SimWallClock, T0};
