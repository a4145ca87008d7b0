// src/main.rs

use anyhow::Result;
use clap::Parser;
use larder::cli::{Cli, Commands};
use larder::{Config, commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();

    // Flags override both file and environment
    if let Some(recipes) = cli.recipes {
        config.recipe_dir = recipes;
    }
    if let Some(cache) = cli.cache {
        config.cache_dir = cache;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(mirror) = cli.mirror {
        config.mirror_base = Some(mirror);
    }

    match cli.command {
        Commands::List => commands::list(&config)?,
        Commands::Show { name, version } => {
            commands::show(&config, &name, version.as_deref())?
        }
        Commands::Fetch { name, version } => {
            commands::fetch(&config, &name, version.as_deref())?
        }
        Commands::Package { name, version } => {
            commands::package(&config, &name, version.as_deref())?
        }
        Commands::Verify { name, version } => {
            commands::verify(&config, &name, version.as_deref())?
        }
        Commands::Clean => commands::clean(&config)?,
    }

    Ok(())
}
