use clap::Parser;
use risksim::{Catalog, ReportFormat};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow, paint_severity};

#[derive(Debug, Parser)]
#[command(about = "List the records available for selection")]
pub struct Command {
    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    output: ReportFormat,
}

impl Command {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let catalog = Catalog::builtin();

        match self.output {
            ReportFormat::Json => {
                println!("{}", serde_json::to_string_pretty(catalog)?);
            }
            ReportFormat::Text => Self::output_text(catalog),
        }
        Ok(())
    }

    fn output_text(catalog: &Catalog) {
        let narrow = is_narrow();

        println!("{}", "Hazards".heading());
        println!("{}", "───────".dim());
        if narrow {
            for hazard in catalog.hazards() {
                println!("{}. {}", hazard.id, hazard.name);
                println!(
                    "   {} p={}",
                    paint_severity(hazard.severity, 0),
                    hazard.probability
                );
            }
        } else {
            println!("{:<4} {:<24} {:<8} Probability", "ID", "Name", "Severity");
            for hazard in catalog.hazards() {
                println!(
                    "{:<4} {:<24} {} {}",
                    hazard.id,
                    hazard.name,
                    paint_severity(hazard.severity, 8),
                    hazard.probability
                );
            }
        }

        println!();
        println!("{}", "Fault Tree Events".heading());
        println!("{}", "─────────────────".dim());
        if narrow {
            for event in catalog.fault_tree_events() {
                println!("{}. {} (p={})", event.id, event.name, event.probability);
            }
        } else {
            println!("{:<4} {:<24} Probability", "ID", "Name");
            for event in catalog.fault_tree_events() {
                println!("{:<4} {:<24} {}", event.id, event.name, event.probability);
            }
        }

        println!();
        println!("{}", "Risk Control Measures".heading());
        println!("{}", "─────────────────────".dim());
        if narrow {
            for measure in catalog.risk_control_measures() {
                println!(
                    "{}. {} (e={})",
                    measure.id, measure.name, measure.effectiveness
                );
            }
        } else {
            println!("{:<4} {:<24} Effectiveness", "ID", "Name");
            for measure in catalog.risk_control_measures() {
                println!(
                    "{:<4} {:<24} {}",
                    measure.id, measure.name, measure.effectiveness
                );
            }
        }
    }
}
