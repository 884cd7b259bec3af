use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bond_core::TemplateRegistry;
use bond_core::form::completion::{completed_sections, completion_percentage};
use bond_core::validation::run_validations;
use bond_data::{LocalDirectory, ScenarioLoader};
use clap::{Parser, Subcommand};

/// Inspect and exchange branding templates and training scenarios.
#[derive(Parser, Debug)]
#[command(name = "bond-template-tool")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in templates
    List {
        /// Only show templates in this category ("all" shows everything)
        #[arg(short, long, default_value = "all")]
        category: String,
    },

    /// Write a built-in template to a JSON file
    Export {
        /// Template id (see `list`)
        #[arg(short, long)]
        id: String,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Import a template file and run the branding checks on it
    Check {
        /// Path to a template JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Apply a scenario CSV to an empty form and report progress
    Scenario {
        /// Path to a CSV with columns field,value,included
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut registry = TemplateRegistry::with_builtins();

    match args.command {
        Command::List { category } => {
            let mut shown = 0;
            for template in registry.by_category(&category) {
                println!(
                    "{:>3}  {:<28} {:<12} {}",
                    template.id, template.name, template.category, template.created_at
                );
                shown += 1;
            }
            if shown == 0 {
                println!("No templates in category '{category}'.");
            }
        }
        Command::Export { id, out } => {
            let sink = LocalDirectory::new(&out);
            let path = registry
                .export_to(&id, &sink)
                .await
                .with_context(|| format!("Failed to export template {id}"))?;
            println!("Template exported to: {}", path.display());
        }
        Command::Check { file } => {
            let source = LocalDirectory::new(".");
            let template = registry
                .import_from(&source, &file)
                .await
                .with_context(|| format!("Failed to import: {}", file.display()))?;
            println!("Imported '{}' ({})", template.name, template.category);

            let report = run_validations(&template.data, None);
            print!("{report}");
            if report.fail_count() > 0 {
                bail!("{} required check(s) failed", report.fail_count());
            }
        }
        Command::Scenario { file } => {
            let reader = File::open(&file)
                .with_context(|| format!("Failed to open: {}", file.display()))?;
            let rows = ScenarioLoader::parse(reader)
                .with_context(|| format!("Failed to parse CSV: {}", file.display()))?;
            println!("Parsed {} rows from CSV", rows.len());

            let record = ScenarioLoader::to_record(&rows);
            let done: Vec<_> = completed_sections(&record)
                .iter()
                .map(|s| s.as_str())
                .collect();
            println!(
                "Completion: {}% (complete: {})",
                completion_percentage(&record),
                if done.is_empty() { "none".to_string() } else { done.join(", ") }
            );
        }
    }

    Ok(())
}
