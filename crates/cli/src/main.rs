use clap::{Parser, Subcommand};
use tracing::info;
use tscns_domain::CliOverrides;

mod bootstrap;
mod commands;

const NS_PER_MS: i64 = 1_000_000;

#[derive(Parser)]
#[command(name = "tscns")]
#[command(version)]
#[command(about = "Wall-clock nanoseconds from the CPU cycle counter")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Pin to this CPU before bootstrapping the clock
    #[arg(long, global = true)]
    cpu: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Warm-up window for the frequency measurement, in milliseconds
    #[arg(long, global = true)]
    init_calibrate_ms: Option<i64>,

    /// Calibration interval, in milliseconds
    #[arg(long, global = true)]
    interval_ms: Option<i64>,

    /// Known counter frequency in GHz; skips the warm-up
    #[arg(long, global = true)]
    ghz: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Measure the per-call cost of rdsysns, rdtsc and rdns
    Latency {
        #[arg(long, default_value_t = 1000)]
        iterations: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Calibrate in a loop and print the error against the system clock
    Monitor {
        /// Stop after this many rounds
        #[arg(long)]
        count: Option<u64>,

        #[arg(long, default_value_t = 500)]
        period_ms: u64,
    },
    /// Run the calibration and drift-report jobs until Ctrl-C
    Watch {
        /// Stop after this many seconds
        #[arg(long)]
        duration_secs: Option<u64>,
    },
    /// Counter frequency the kernel derives from its TSC calibration
    Freq {
        /// Refined TSC frequency in kHz, as printed by the kernel at boot
        tsc_khz: u32,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        init_calibrate_ns: cli.init_calibrate_ms.map(|ms| ms.saturating_mul(NS_PER_MS)),
        calibrate_interval_ns: cli.interval_ms.map(|ms| ms.saturating_mul(NS_PER_MS)),
        cpu: cli.cpu,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!("Starting tscns v{}", env!("CARGO_PKG_VERSION"));

    if let Command::Freq { tsc_khz } = cli.command {
        return commands::freq::run(tsc_khz);
    }

    let clock = bootstrap::build_clock(&config, cli.ghz)?;

    match cli.command {
        Command::Latency { iterations, json } => commands::latency::run(clock, iterations, json),
        Command::Monitor { count, period_ms } => commands::monitor::run(&clock, count, period_ms),
        Command::Watch { duration_secs } => {
            commands::watch::run(clock, &config.monitor, duration_secs).await
        }
        Command::Freq { .. } => Ok(()),
    }
}
