//! The `rawdrop config` command for configuration management.

use clap::{Args, Subcommand};
use rawdrop_core::config::ENV_VARS;
use rawdrop_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration (file plus environment)
    Show,

    /// Show config file path
    Path,

    /// List the environment variables that override config values
    Env,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let mut config = config;
            config.apply_env_overrides()?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }

        ConfigCommand::Env => {
            for var in ENV_VARS {
                match std::env::var(var) {
                    Ok(value) => println!("{var}={value}"),
                    Err(_) => println!("{var} (unset)"),
                }
            }
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = Config::default().to_toml()?;
            std::fs::write(&path, toml)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}
