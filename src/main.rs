use anyhow::{Context, Result};
use clap::Parser;
use ecotick_core::catalog::Catalog;
use ecotick_core::config::AppConfig;
use ecotick_core::metrics::init_logging;
use ecotick_lib::app::{self, Scheduler, ShutdownManager, Simulation};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to run the simulation in
    #[arg(short, long, value_enum, default_value = "run")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Species catalog (TOML). The built-in woodland catalog when omitted
    #[arg(long)]
    catalog: Option<String>,

    /// Ticks to run in headless mode
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Seed for a fresh start
    #[arg(long)]
    seed: Option<u32>,

    /// Speed level 1-10
    #[arg(long)]
    speed: Option<u8>,

    /// Snapshot file, overrides the config. `.gz` enables compression
    #[arg(long)]
    save: Option<String>,

    /// Ignore any saved snapshot
    #[arg(long)]
    fresh: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    Run,
    Headless,
}

fn load_catalog(path: Option<&str>) -> Result<Catalog> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading catalog {path}"))?;
            Catalog::from_toml(&text).with_context(|| format!("parsing catalog {path}"))
        }
        None => Ok(Catalog::default_catalog()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(&args.config);
    if let Some(seed) = args.seed {
        config.scheduler.seed = Some(seed);
    }
    if let Some(speed) = args.speed {
        config.scheduler.speed = speed;
    }
    if let Some(save) = args.save {
        config.persistence.path = save;
    }
    config.validate()?;

    init_logging(&config.logging.level);
    tracing::info!(fingerprint = %config.fingerprint(), "Configuration loaded");

    let catalog = load_catalog(args.catalog.as_deref())?;
    let store = app::open_store(&config.persistence);
    let logger = app::open_event_log(&config.logging);
    let sim = Simulation::init(catalog, &config, store.as_ref(), args.fresh, logger);
    let scheduler = Scheduler::new(sim, store, &config.scheduler);

    let mut shutdown = ShutdownManager::new();
    shutdown.set_save_on_exit(config.persistence.enabled);
    shutdown.listen_for_ctrl_c();

    match args.mode {
        Mode::Headless => app::run_headless(scheduler, shutdown, args.ticks).await,
        Mode::Run => app::run_interactive(scheduler, shutdown).await,
    }

    Ok(())
}
