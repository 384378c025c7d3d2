//! Command line interface
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kiln run` | Bootstrap the engine and report what ran |
//! | `kiln modules` | List every module known to the process |
//! | `kiln resolve <IDENTITY>` | Bootstrap, then load a module through the loader and its fallback |

use clap::{Parser, Subcommand};
use kiln_application::ModuleState;
use kiln_domain::error::Result;
use kiln_infrastructure::{AppContext, ConfigLoader, init_app, init_logging};
use std::path::PathBuf;
use tracing::info;

/// Command line interface for Kiln
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(about = "Kiln - Process bootstrap and plugin-orchestration engine")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for module libraries
    #[arg(short, long)]
    pub modules_dir: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Kiln subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bootstrap the engine
    Run,
    /// List known modules
    Modules,
    /// Resolve a module by identity (`name` or `name@version`)
    Resolve {
        /// Module identity
        identity: String,
    },
}

impl Cli {
    /// Load configuration, apply command line overrides and build the context
    pub fn context(&self) -> Result<AppContext> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &self.config {
            loader = loader.with_config_path(path);
        }
        let mut config = loader.load()?;
        if let Some(directory) = &self.modules_dir {
            config.modules.directory = Some(directory.clone());
        }

        init_logging(&config.logging)?;
        init_app(config)
    }
}

/// Run the parsed command line
pub fn run(cli: &Cli) -> Result<()> {
    let context = cli.context()?;

    match &cli.command {
        Command::Run => {
            let provider = context.start()?;
            info!(
                registrations = provider.descriptors().len(),
                singletons = context.singletons().len(),
                "Bootstrap complete"
            );
            println!(
                "started: {} modules, {} service registrations",
                context.catalog().len(),
                provider.descriptors().len()
            );
        }
        Command::Modules => {
            for module in context.catalog().modules() {
                let state = match module.state() {
                    ModuleState::Ready => "ready".to_string(),
                    ModuleState::Faulted(reason) => format!("faulted: {reason}"),
                };
                match module.path() {
                    Some(path) => {
                        println!("{}\t{}\t{}", module.identity(), state, path.display());
                    }
                    None => println!("{}\t{}\tlinked", module.identity(), state),
                }
            }
        }
        Command::Resolve { identity } => {
            context.start()?;
            let module = context.loader().load(identity)?;
            println!("{identity} -> {}", module.identity());
        }
    }
    Ok(())
}
