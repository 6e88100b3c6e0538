//! Models command - manage the emotion model.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use photo_pick_adapters::models::{ModelStore, MODELS};

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    /// Custom models directory (overrides the default data directory)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download required models
    Fetch,
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

/// Run the models command.
///
/// # Errors
///
/// Returns an error if a model download or verification fails.
pub fn run(args: &ModelsArgs) -> Result<()> {
    let store = ModelStore::new(args.models_dir.clone());
    match args.command {
        ModelsCommand::Fetch => {
            store.ensure()?;
            println!("All models downloaded");
            Ok(())
        }
        ModelsCommand::List => print_list(&store),
        ModelsCommand::Path => {
            println!("{}", store.dir().display());
            Ok(())
        }
    }
}

#[allow(clippy::unnecessary_wraps)]
fn print_list(store: &ModelStore) -> Result<()> {
    let models = store.list();

    println!("Models directory: {}", store.dir().display());
    println!();

    for (name, installed) in &models {
        let status = if *installed { "✓" } else { "✗" };
        let filename = MODELS
            .iter()
            .find(|m| m.name == name)
            .map_or("unknown", |m| m.filename);
        println!("  {status} {name} ({filename})");
    }

    println!();
    let installed_count = models.iter().filter(|(_, installed)| *installed).count();
    println!("{}/{} models installed", installed_count, models.len());

    Ok(())
}
