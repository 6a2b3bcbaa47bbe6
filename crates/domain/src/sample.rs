/// The lowest-jitter correspondence picked out of one sampling round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Midpoint of the two counter reads bracketing `wall_ns`.
    pub cycles: i64,
    pub wall_ns: i64,
    /// Counter ticks spent inside the wall-clock call.
    pub bracket_cycles: i64,
}

impl Anchor {
    #[inline]
    pub fn from_bracket(lo: i64, hi: i64, wall_ns: i64) -> Self {
        Self {
            cycles: lo + (hi - lo) / 2,
            wall_ns,
            bracket_cycles: hi - lo,
        }
    }
}
