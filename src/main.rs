use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use step_manager::config::Config;
use step_manager::logging;
use step_manager::walk::{Action, Walk};

#[derive(Parser)]
#[command(name = "stepper")]
#[command(about = "Walk a configured step group one step at a time")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved step group
    Show {
        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay actions against the step group
    Walk {
        /// Actions: next, prev, to:<name>, to:#<n>, add:<name>, remove:<name>,
        /// linear:<bool>, set:<name>, clear
        #[arg(required = true)]
        actions: Vec<Action>,

        /// Print each view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a config file with the defaults
    Init {
        /// Destination (default: ./stepper.toml)
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let _logging = logging::init_logging(&config, cli.debug)?;

    match cli.command {
        Commands::Show { json } => {
            let walk = Walk::from_config(&config.wizard)?;
            print_state(&walk, None, json)?;
        }
        Commands::Walk { actions, json } => {
            let mut walk = Walk::from_config(&config.wizard)?;
            print_state(&walk, None, json)?;
            for action in &actions {
                walk.apply(action)?;
                print_state(&walk, Some(action), json)?;
            }
        }
        Commands::Init { path } => {
            let path = path.unwrap_or_else(Config::local_config_path);
            Config::default()
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn print_state(walk: &Walk, action: Option<&Action>, json: bool) -> Result<()> {
    if json {
        let view = serde_json::to_string(&walk.view()).context("Failed to serialize view")?;
        println!("{}", view);
        return Ok(());
    }

    let label = action.map(ToString::to_string).unwrap_or_else(|| "start".to_string());
    let view = walk.view();
    println!(
        "{:<16} {}  (next: {}, previous: {})",
        label,
        walk.manager().format_progress(),
        if view.has_next_step { "yes" } else { "no" },
        if view.has_previous_step { "yes" } else { "no" },
    );
    if let Some(host) = walk.host_value() {
        println!("{:<16} bound value: {}", "", host);
    }
    Ok(())
}
