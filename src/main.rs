use std::path::Path;

use anyhow::Context;
use clap::Parser;

use credvault::cli::{self, Args};
use credvault::{Config, RecordStore, Storage};

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(config.log_level)
        .format_timestamp_secs()
        .format_module_path(true)
        .format_target(false);

    if let Some(path) = &config.log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();
    let mut config = Config::load();
    if let Some(storage) = &args.storage {
        config.storage_url = storage.clone();
    }

    init_logging(&config)?;
    log::debug!("Loaded config: {:?}", config);

    let storage = Storage::open(&config.storage_url)
        .with_context(|| format!("opening storage '{}'", config.storage_url))?;
    log::info!("Using {} storage at {}", storage.get_backend_type(), config.storage_url);

    let (mut store, outcome) = RecordStore::open(storage, &config)?;
    cli::report_load_outcome(&outcome);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = cli::run(args.command, &mut store, &config, &mut out) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}
