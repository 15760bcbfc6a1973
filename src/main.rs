use clap::Parser;
use color_eyre::Result;
use dayone_obsidian::{Config, cli::{Cli, Commands}};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Log to stderr; RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Run { journal } => {
            dayone_obsidian::cli::handle_run(&config, journal)?;
        }
        Commands::Convert { journal_file, import_dir, export_dir, tags } => {
            dayone_obsidian::cli::handle_convert(&config, journal_file, import_dir, export_dir, tags)?;
        }
        Commands::Journals => {
            dayone_obsidian::cli::handle_journals(&config)?;
        }
    }

    Ok(())
}
