mod cli;
mod runner;
mod scenario;

use std::io::Write;

use tracing_subscriber::EnvFilter;
use websurface::{event_channel, HeadlessEngine, Surface, SurfaceRegistry};
use websurface_common::WebSurfaceError;
use websurface_config::WebSurfaceConfig;

use crate::runner::Runner;
use crate::scenario::Scenario;

const DEFAULT_LOG_DIRECTIVE: &str = "websurface=info";

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &cli::Args) -> WebSurfaceConfig {
    let loaded = match &args.config {
        Some(path) => websurface_config::load_from_path(path),
        None => websurface_config::load_config(),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("websurface: config load failed, using defaults: {e}");
        WebSurfaceConfig::default()
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> websurface_common::Result<()> {
    let args = cli::parse();

    // Logging depends on config, so config errors go to stderr directly.
    let config = load_config(&args);
    let directive = args
        .log_directive()
        .unwrap_or_else(|| config.logging.level.as_filter_directive());
    init_logging(&directive);

    tracing::info!("websurface v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }

    if args.print_config {
        println!("{}", websurface_config::config_to_json(&config));
        return Ok(());
    }
    let Some(scenario_path) = &args.scenario else {
        return Err(WebSurfaceError::Scenario("no scenario file given".into()));
    };

    let scenario = Scenario::load(scenario_path)?;
    tracing::info!(
        steps = scenario.steps.len(),
        "Replaying {}",
        scenario_path.display()
    );

    let (sink, events) = event_channel();
    let surface = Surface::from_config(
        args.surface_id(),
        HeadlessEngine::new(),
        sink,
        &config.surface,
    );
    let mut runner = Runner::new(surface, events);
    let mut registry = SurfaceRegistry::new();
    registry.register(runner.handle().clone());

    let mut records = runner.run(&scenario).await?;

    registry.destroy_all();
    records.extend(runner.flush());

    let mut stdout = std::io::stdout().lock();
    for record in &records {
        writeln!(stdout, "{}", record.to_json())?;
    }
    stdout.flush()?;

    tracing::info!(
        records = records.len(),
        state = ?runner.surface().lifecycle_state(),
        "Shutdown complete"
    );
    Ok(())
}
