use tscns_domain::clocksource::tsc_ghz_from_khz;

/// Print the frequency the kernel's clocksource uses for `tsc_khz`.
///
/// Feeding this to `--ghz` starts the clock on the same slope as
/// `CLOCK_REALTIME`, so the first calibrations have almost nothing to fix.
pub fn run(tsc_khz: u32) -> anyhow::Result<()> {
    let ghz = tsc_ghz_from_khz(tsc_khz)?;
    println!("tsc_ghz: {}", format_significant(ghz, 17));
    Ok(())
}

fn format_significant(value: f64, digits: usize) -> String {
    let exponent = if value == 0.0 {
        0
    } else {
        value.abs().log10().floor() as i64
    };
    let decimals = (digits as i64 - 1 - exponent).max(0) as usize;
    format!("{:.*}", decimals, value)
}
