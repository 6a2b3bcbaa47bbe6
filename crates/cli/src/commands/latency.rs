use std::sync::Arc;
use tscns_application::use_cases::MeasureLatencyUseCase;
use tscns_infrastructure::SystemTscns;

pub fn run(clock: Arc<SystemTscns>, iterations: u64, json: bool) -> anyhow::Result<()> {
    let report = MeasureLatencyUseCase::new(clock).execute(iterations);

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!(
            "rdsysns_latency: {:.3} ns, rdtsc_latency: {:.3} ns, rdns_latency: {:.3} ns ({} iterations)",
            report.rdsysns_ns, report.rdtsc_ns, report.rdns_ns, report.iterations
        );
    }
    Ok(())
}
