use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use vitals::application::config::EngineConfig;
use vitals::domain::entities::metric::MetricUnit;
use vitals::infrastructure::probes::SysinfoProbe;
use vitals::PerfMonitor;

#[derive(Parser, Debug)]
#[command(name = "vitals", about = "Runtime performance monitor with self-remediation")]
struct Cli {
    /// Path to a TOML config file (created with defaults when missing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a single health report and exit
    #[arg(long)]
    once: bool,

    /// Override the configured sampling interval, in seconds
    #[arg(short, long)]
    interval: Option<u64>,
}

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  VITALS — Runtime Performance Monitor".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_report(monitor: &PerfMonitor) -> anyhow::Result<()> {
    let stats = monitor.stats(None);
    println!("{}", "Aggregate statistics:".bold());
    println!("{}", serde_json::to_string_pretty(&stats)?);

    match monitor.memory_stats() {
        Some(report) => {
            println!("{}", "Memory:".bold());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        None => println!("Memory: {}", "usage reporting unavailable".dimmed()),
    }

    let health = monitor.health();
    println!("Health: {}", health.to_string().bold());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        EngineConfig::load_or_create(path)?
    } else {
        EngineConfig::load()?
    };

    // Manual DI — main.rs is the only place that knows concrete types
    let probe = Arc::new(SysinfoProbe::new());
    let monitor = PerfMonitor::new(&config, probe, Vec::new(), None);

    if cli.once {
        // One synthetic measurement so the report has something to show
        let _: Result<(), anyhow::Error> = monitor
            .measure_operation("startup_probe", async { Ok(()) })
            .await;
        print_report(&monitor)?;
        return Ok(());
    }

    print_banner();

    // Echo every alert to the terminal
    let printer = monitor.on_alert(|alert| {
        println!(
            "[{}] {}",
            alert.level.colored_label(),
            alert.message
        );
    });

    let interval = cli.interval.map(Duration::from_secs);
    monitor.start_monitoring(interval);
    monitor.record_metric("monitor_started", 1.0, MetricUnit::Count, HashMap::new());
    tracing::info!("Monitoring started, Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    monitor.stop_monitoring();
    printer.cancel();
    println!();
    print_report(&monitor)?;

    Ok(())
}
