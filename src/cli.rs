use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::walker::{self, JournalJob, WalkError, WalkSummary};

#[derive(Parser)]
#[command(name = "dayone-obsidian")]
#[command(about = "Convert Day One journal exports into Obsidian markdown notes")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert the journals listed in the config file
    Run {
        /// Only convert the journal with this name
        #[arg(long)]
        journal: Option<String>,
    },
    /// Convert a single Day One JSON export
    Convert {
        /// Day One journal JSON file
        journal_file: PathBuf,
        /// Folder holding photos/, videos/ and audios/ (default: the file's folder)
        #[arg(long)]
        import_dir: Option<PathBuf>,
        /// Where notes are written (default: <import dir>/<file name>)
        #[arg(long)]
        export_dir: Option<PathBuf>,
        /// Base tag added to every note, repeatable (default: config default_tags)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List configured journals
    Journals,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Conversion failed: {0}")]
    WalkError(#[from] WalkError),
    #[error("Journal not found in config: {0}")]
    JournalNotFound(String),
}

/// Handle the run command
pub fn handle_run(config: &Config, journal: Option<String>) -> Result<(), CliError> {
    let jobs = match journal {
        Some(name) => {
            let journal = config
                .journal(&name)
                .ok_or(CliError::JournalNotFound(name))?;
            vec![journal.to_job(&config.default_tags)]
        }
        None => config.jobs(),
    };

    if jobs.is_empty() {
        println!("No journals configured. Add [[journals]] entries to the config file.");
        return Ok(());
    }

    for job in &jobs {
        let summary = walker::convert_journal(job)?;
        print_summary(&summary);
    }

    Ok(())
}

/// Handle the convert command
pub fn handle_convert(
    config: &Config,
    journal_file: PathBuf,
    import_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    tags: Vec<String>,
) -> Result<(), CliError> {
    let job = adhoc_job(journal_file, import_dir, export_dir, tags, &config.default_tags);
    let summary = walker::convert_journal(&job)?;
    print_summary(&summary);
    Ok(())
}

/// Handle the journals command
pub fn handle_journals(config: &Config) -> Result<(), CliError> {
    if config.journals.is_empty() {
        println!("No journals configured.");
        return Ok(());
    }

    for job in config.jobs() {
        println!("{}", job.name);
        println!("  journal: {}", job.journal_file.display());
        println!("  media:   {}", job.import_dir.display());
        println!("  export:  {}", job.export_dir.display());
        println!("  tags:    {}", job.base_tags.join(" "));
    }

    Ok(())
}

/// Build a job for a journal file given on the command line
pub fn adhoc_job(
    journal_file: PathBuf,
    import_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    tags: Vec<String>,
    default_tags: &[String],
) -> JournalJob {
    let name = journal_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "journal".to_string());

    let import_dir = import_dir.unwrap_or_else(|| match journal_file.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    });
    let export_dir = export_dir.unwrap_or_else(|| import_dir.join(&name));
    let base_tags = if tags.is_empty() {
        default_tags.to_vec()
    } else {
        tags
    };

    JournalJob {
        name,
        import_dir,
        journal_file,
        export_dir,
        base_tags,
    }
}

fn print_summary(summary: &WalkSummary) {
    println!(
        "{}: {} entries processed, {} attachments renamed, notes in {}",
        summary.name,
        summary.entries,
        summary.renamed,
        summary.export_dir.display()
    );
    println!("Complete: {} entries processed.", summary.entries);
}
