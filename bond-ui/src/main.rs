use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bond_ui::{Step, TrainerApp, TrainerConfig, commands, logging};
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Offshore bond application form trainer.
///
/// Walks a trainee through the seven tabs of the application, with branding
/// and a template library, one command per line.
#[derive(Debug, Parser)]
#[command(name = "bond-trainer", version)]
struct Cli {
    /// TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read commands from this file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Import every `*.json` template in this directory at startup.
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Log level or `EnvFilter` directive; overrides the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Where exports are written; overrides the config file.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

// ─── startup ─────────────────────────────────────────────────────────────────

fn load_config(cli: &Cli) -> Result<TrainerConfig> {
    let mut config = match &cli.config {
        Some(path) => TrainerConfig::load(path)?,
        None => TrainerConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

async fn import_templates(
    app: &mut TrainerApp,
    dir: &Path,
) -> Result<()> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read template folder: {}", dir.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let command = commands::Command::ImportTemplate(path.clone());
        if let Err(e) = app.execute(command).await {
            warn!(path = %path.display(), "skipping template: {e:#}");
        }
    }
    info!(count = app.templates().len(), "template library ready");
    Ok(())
}

// ─── command loop ────────────────────────────────────────────────────────────

async fn run<R: AsyncBufRead + Unpin>(
    app: &mut TrainerApp,
    input: R,
    interactive: bool,
) -> Result<()> {
    let mut lines = input.lines();
    loop {
        if interactive {
            print!("{}", app.prompt());
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match app.execute(command).await {
            Ok(Step::Output(text)) => println!("{text}"),
            Ok(Step::Quit) => break,
            Err(e) => println!("Error: {e:#}"),
        }
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    logging::init_logging(&config.log_level, config.log_stdout)?;
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }
    debug!("{config}");

    let mut app = TrainerApp::new(config);
    if let Some(dir) = &cli.templates {
        import_templates(&mut app, dir).await?;
    }

    match &cli.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open script: {}", path.display()))?;
            run(&mut app, BufReader::new(file), false).await
        }
        None => {
            let interactive = std::io::stdin().is_terminal();
            if interactive {
                println!("Type 'help' for commands.");
            }
            run(&mut app, BufReader::new(tokio::io::stdin()), interactive).await
        }
    }
}
