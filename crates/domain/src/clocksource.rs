//! The Linux kernel's clocksource mult/shift derivation.
//!
//! The kernel converts TSC ticks with `ns = (cycles * mult) >> shift`, so
//! the effective frequency it runs its clock at is `2^shift / mult` GHz.
//! Feeding that value to `init_with_frequency` makes the fast clock tick
//! at exactly the rate the kernel uses, skipping the warm-up calibration.
//! `tsc_khz` comes from `dmesg | grep "Refined TSC clocksource calibration"`
//! with the decimal point removed.

use crate::errors::DomainError;

/// Conversion range, in seconds, the kernel asks of the TSC clocksource.
pub const TSC_MAX_CONVERSION_SECS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultShift {
    pub mult: u32,
    pub shift: u32,
}

impl MultShift {
    pub fn ghz(&self) -> f64 {
        (1u64 << self.shift) as f64 / self.mult as f64
    }
}

/// Mirror of `clocks_calc_mult_shift` in `kernel/time/clocksource.c`.
///
/// `from` and `to` are frequencies in the same unit; `max_sec` bounds the
/// conversion range in units of `1 / from`.
pub fn clocks_calc_mult_shift(from: u32, to: u32, max_sec: u32) -> MultShift {
    let mut sftacc: u32 = 32;

    // Shift factor limiting the conversion range.
    let mut tmp = (max_sec as u64 * from as u64) >> 32;
    while tmp != 0 {
        tmp >>= 1;
        sftacc -= 1;
    }

    // Best-accuracy shift/mult pair that still fits the range.
    let mut shift = 0;
    let mut mult = 0u64;
    for sft in (1..=32u32).rev() {
        mult = ((to as u64) << sft) + from as u64 / 2;
        mult /= from as u64;
        if mult >> sftacc == 0 {
            shift = sft;
            break;
        }
    }

    MultShift {
        mult: mult as u32,
        shift,
    }
}

pub fn tsc_ghz_from_khz(tsc_khz: u32) -> Result<f64, DomainError> {
    if tsc_khz == 0 {
        return Err(DomainError::InvalidFrequency(
            "tsc_khz must be greater than zero".to_string(),
        ));
    }
    let ms = clocks_calc_mult_shift(tsc_khz, 1_000_000, TSC_MAX_CONVERSION_SECS * 1000);
    if ms.mult == 0 {
        return Err(DomainError::InvalidFrequency(format!(
            "no usable mult/shift pair for {} kHz",
            tsc_khz
        )));
    }
    Ok(ms.ghz())
}
