use std::path::Path;

use risksim::{Config, ReportFormat};
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
/// Show or modify configuration
///
/// Configuration is stored in TOML (by default 'risk.toml' in the working
/// directory) and controls how reports are displayed.
///
/// Available configuration keys:
///   precision  Decimal places used for scores (default: 6)
///   format     Default report format, text or json (default: text)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show all configuration values
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key to retrieve
        ///
        /// Available keys: precision, format
        key: String,
    },

    /// Set a configuration value
    ///
    /// Examples:
    ///   risk config set precision 4
    ///   risk config set format json
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Show => Self::show_config(config_path),
            ConfigCommand::Get { key } => Self::get_config(config_path, &key),
            ConfigCommand::Set { key, value } => Self::set_config(config_path, &key, &value),
            ConfigCommand::Init { force } => Self::init_config(config_path, force),
        }
    }

    fn show_config(config_path: &Path) -> anyhow::Result<()> {
        let config = Config::load_or_default(config_path)?;

        println!(
            "Configuration: {}",
            if config_path.exists() {
                config_path.display().to_string()
            } else {
                "(defaults)".dim()
            }
        );
        println!("  precision: {}", config.precision());
        println!("  format: {}", config.format);
        Ok(())
    }

    fn get_config(config_path: &Path, key: &str) -> anyhow::Result<()> {
        let config = Config::load_or_default(config_path)?;

        match key {
            "precision" => println!("{}", config.precision()),
            "format" => println!("{}", config.format),
            _ => {
                anyhow::bail!(
                    "Unknown configuration key: '{key}'\n\nAvailable keys:\n  precision\n  format",
                );
            }
        }
        Ok(())
    }

    fn set_config(config_path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
        let mut config = Config::load_or_default(config_path)?;

        match key {
            "precision" => {
                let precision = value
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("Value must be a non-negative integer"))?;
                config.set_precision(precision);
                if config.precision() != precision {
                    eprintln!(
                        "{}",
                        format!("Precision clamped to {}", config.precision()).warning()
                    );
                }
            }
            "format" => {
                config.format = value
                    .parse::<ReportFormat>()
                    .map_err(|e| anyhow::anyhow!(e))?;
            }
            _ => {
                anyhow::bail!(
                    "Unknown configuration key: '{key}'\nSupported keys: precision, format",
                );
            }
        }

        config.save(config_path)?;
        println!(
            "{}",
            format!("Set {key} in {}", config_path.display()).success()
        );
        Ok(())
    }

    fn init_config(config_path: &Path, force: bool) -> anyhow::Result<()> {
        if config_path.exists() && !force {
            anyhow::bail!(
                "Configuration file {} already exists (use --force to overwrite)",
                config_path.display()
            );
        }

        Config::default().save(config_path)?;
        println!("Created {}", config_path.display());
        Ok(())
    }
}
