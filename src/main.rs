use clap::Parser;
use shiptrack::api::{start_api_server, AppState};
use shiptrack::cli::{
    print_items, Cli, Commands, OutputMode, ShipmentRow, TransitionRow, TransporterRow,
};
use shiptrack::config::AppConfig;
use shiptrack::error::Result;
use shiptrack::seed;
use shiptrack::simulator::{ShipmentGateway, StatusSimulator, TickOutcome};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mode = OutputMode::from_json_flag(cli.json);

    match &cli.command {
        Some(Commands::Serve { port, no_simulator }) => {
            let mut config = AppConfig::load_from(&cli.config)?;
            init_logging(&config);
            if let Some(port) = port {
                config.server.port = *port;
            }
            if *no_simulator {
                config.simulator.enabled = false;
            }
            run_server(config).await?;
        }
        Some(Commands::Simulate { ticks, seed }) => {
            init_logging_simple();
            let mut config = AppConfig::load_from(&cli.config)?;
            if seed.is_some() {
                config.simulator.rng_seed = *seed;
            }
            run_simulation(&config, *ticks, mode).await?;
        }
        Some(Commands::Seed) => {
            init_logging_simple();
            let config = AppConfig::load_from(&cli.config)?;
            let authority = seed::build_authority(&config)?;
            let snapshot = authority.snapshot().await;
            let transporters: Vec<TransporterRow> =
                snapshot.transporters.iter().map(TransporterRow::from).collect();
            let shipments: Vec<ShipmentRow> =
                snapshot.shipments.iter().map(ShipmentRow::from).collect();
            print_items(&transporters, mode)?;
            print_items(&shipments, mode)?;
        }
        None => {
            let config = AppConfig::load_from(&cli.config)?;
            init_logging(&config);
            run_server(config).await?;
        }
    }

    Ok(())
}

fn init_logging(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},shiptrack=debug", config.logging.level))
    });

    let log_dir = std::env::var("SHIPTRACK_LOG_DIR").ok();

    // `tracing_appender::rolling::daily` panics if it cannot create the
    // initial file, so writability is checked first.
    let file_layer = log_dir.as_deref().and_then(|log_dir| {
        if std::fs::create_dir_all(log_dir).is_err() {
            eprintln!(
                "Warning: Could not create log directory {}, file logging disabled",
                log_dir
            );
            return None;
        }
        let test_path = std::path::Path::new(log_dir).join(".shiptrack_write_test");
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&test_path)
        {
            Ok(_) => {
                let _ = std::fs::remove_file(&test_path);

                let file_appender = tracing_appender::rolling::daily(log_dir, "shiptrack.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                // Keep the guard alive for the process lifetime
                Box::leak(Box::new(guard));

                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not write to log directory {} ({}), file logging disabled",
                    log_dir, e
                );
                None
            }
        }
    });

    let (console_plain, console_json) = if config.logging.json {
        (None, Some(tracing_subscriber::fmt::layer().json().with_target(true)))
    } else {
        (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            ),
            None,
        )
    };

    let file_logging_enabled = file_layer.is_some();
    tracing_subscriber::registry()
        .with(filter)
        .with(console_plain)
        .with(console_json)
        .with(file_layer)
        .init();

    if let (true, Some(dir)) = (file_logging_enabled, log_dir) {
        eprintln!("Logging to: {}/shiptrack.log", dir);
    }
}

fn init_logging_simple() {
    // Minimal logging for one-shot commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}

async fn run_server(config: AppConfig) -> Result<()> {
    let authority = Arc::new(seed::build_authority(&config)?);
    let gateway: Arc<dyn ShipmentGateway> = authority.clone();
    let simulator = Arc::new(StatusSimulator::new(gateway, &config.simulator));

    if config.simulator.enabled {
        simulator.start().await;
        info!(
            "Status simulator running every {}ms",
            config.simulator.tick_interval_ms
        );
    } else {
        info!("Status simulator disabled; start it via POST /api/simulator/start");
    }

    let state = AppState::new(authority, simulator.clone());
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };

    let result = start_api_server(state, &config.server, shutdown).await;
    simulator.stop().await;
    info!("Shiptrack stopped");
    result
}

async fn run_simulation(config: &AppConfig, ticks: u32, mode: OutputMode) -> Result<()> {
    let authority = Arc::new(seed::build_authority(config)?);
    let gateway: Arc<dyn ShipmentGateway> = authority.clone();
    let simulator = StatusSimulator::new(gateway, &config.simulator);

    let mut transitions = Vec::new();
    for tick in 1..=ticks {
        match simulator.tick().await {
            TickOutcome::Advanced(t) => transitions.push(TransitionRow::new(tick, &t)),
            TickOutcome::Failed { shipment_id, error } => {
                eprintln!(
                    "tick {}: {} failed: {}",
                    tick,
                    shipment_id.as_deref().unwrap_or("listing"),
                    error
                );
            }
            TickOutcome::Idle | TickOutcome::Unchanged { .. } => {}
        }
    }

    print_items(&transitions, mode)?;
    let shipments: Vec<ShipmentRow> = authority
        .list_shipments()
        .await
        .iter()
        .map(ShipmentRow::from)
        .collect();
    print_items(&shipments, mode)?;
    Ok(())
}
