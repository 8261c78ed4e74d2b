use std::path::PathBuf;

mod assess;
mod catalog;
mod config;
mod interactive;
mod terminal;

use assess::Assess;
use clap::ArgAction;
use risksim::{Config, ReportFormat};
use tracing::instrument;

/// The configuration file used when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "risk.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    ///
    /// Defaults to 'risk.toml' in the working directory. A missing default
    /// file is not an error.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config_path = self
            .config
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        self.command
            .unwrap_or_else(|| Command::Assess(Assess::default()))
            .run(&config_path)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List the hazard, fault tree event and risk control measure catalogs
    Catalog(catalog::Command),

    /// Select records, compute both risk scores and print the report
    /// (default)
    ///
    /// Selections are applied in the order given. Naming the same id twice
    /// toggles it back off.
    Assess(Assess),

    /// Run an interactive risk analysis session
    ///
    /// Scores are only recomputed when asked for, so they can go stale as
    /// the selection changes.
    Interactive(interactive::Command),

    /// Show or modify configuration settings
    Config(config::Command),
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    fn run(self, config_path: &std::path::Path) -> anyhow::Result<()> {
        match self {
            Self::Catalog(command) => command.run()?,
            Self::Assess(command) => command.run(&load_config(config_path)?)?,
            Self::Interactive(command) => command.run(&load_config(config_path)?)?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

fn load_config(path: &std::path::Path) -> anyhow::Result<Config> {
    let config = Config::load_or_default(path)?;
    tracing::debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

/// Resolves an `--output` override against the configured default.
fn output_format(output: Option<ReportFormat>, config: &Config) -> ReportFormat {
    output.unwrap_or(config.format)
}
