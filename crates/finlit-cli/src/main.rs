use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use finlit_cli::{Cli, execute};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.config();
    debug!("glossary at {}", config.glossary_path.display());
    debug!("locale tables at {}", config.locales_dir.display());
    if let Some(path) = &config.curriculum_path {
        debug!("curriculum outline at {}", path.display());
    }
    debug!(
        "language preference {:?}, knowledge level {}",
        config.language, config.level
    );

    let output = execute(&cli.command, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}
