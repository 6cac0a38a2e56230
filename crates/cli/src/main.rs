use adguard_exporter_api::AppState;
use adguard_exporter_domain::config::parse_duration;
use adguard_exporter_domain::CliOverrides;
use adguard_exporter_jobs::JobRunner;
use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod bootstrap;
mod di;
mod server;

const JOB_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "adguard-exporter")]
#[command(version)]
#[command(about = "Prometheus exporter for AdGuard Home")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", env = "CONFIG_FILE")]
    config: Option<String>,

    /// Exporter HTTP port
    #[arg(short = 'p', long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long, env = "SERVER_HOST")]
    bind: Option<String>,

    /// Poll interval ("30s", "5m", bare seconds)
    #[arg(long, env = "APP_INTERVAL", value_parser = parse_interval)]
    interval: Option<Duration>,

    /// YAML file with additional targets
    #[arg(long, value_name = "FILE", env = "CLIENTS_FILE")]
    targets_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

fn parse_interval(raw: &str) -> Result<Duration, String> {
    parse_duration(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind.clone(),
        interval: cli.interval,
        targets_file: cli.targets_file.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting AdGuard exporter v{}", env!("CARGO_PKG_VERSION"));
    bootstrap::log_config_summary(cli.config.as_deref(), &config);

    let shutdown = CancellationToken::new();
    let exporter = di::Exporter::new(&config)?;

    let mut runner = JobRunner::new().with_shutdown_token(shutdown.clone());
    for job in exporter.poll_jobs {
        runner = runner.with_poll_job(job);
    }
    let handles = runner.start().await;

    let app_state = AppState {
        metrics: exporter.reporter,
        health: exporter.health,
    };

    tokio::spawn(server::cancel_on_signal(shutdown.clone()));

    let web_addr = config.server.socket_address();
    let served = server::start_web_server(&web_addr, app_state, shutdown.clone()).await;

    // A bind failure must still stop the pollers.
    shutdown.cancel();
    for handle in handles {
        if tokio::time::timeout(JOB_DRAIN_TIMEOUT, handle).await.is_err() {
            warn!("Poll job did not stop in time");
        }
    }

    served?;
    info!("Exporter shutdown complete");
    Ok(())
}
