use clap::Parser;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use risksim::{
    Catalog, Config, Record, Report, ReportFormat, Selection, Session, Toggle, report::format_score,
};
use tracing::{debug, instrument};

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Select records and compute scores step by step")]
pub struct Command {
    /// Format used by the 'Show report' action; defaults to the configured
    /// format
    #[arg(long, value_name = "FORMAT")]
    output: Option<ReportFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ToggleHazard,
    ToggleFaultTreeEvent,
    ToggleRiskControlMeasure,
    ComputeInitial,
    ComputeFinal,
    EditContext,
    ShowReport,
    Quit,
}

impl Action {
    const ALL: [Self; 8] = [
        Self::ToggleHazard,
        Self::ToggleFaultTreeEvent,
        Self::ToggleRiskControlMeasure,
        Self::ComputeInitial,
        Self::ComputeFinal,
        Self::EditContext,
        Self::ShowReport,
        Self::Quit,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::ToggleHazard => "Toggle hazard",
            Self::ToggleFaultTreeEvent => "Toggle fault tree event",
            Self::ToggleRiskControlMeasure => "Toggle risk control measure",
            Self::ComputeInitial => "Calculate initial risk score",
            Self::ComputeFinal => "Calculate final risk score",
            Self::EditContext => "Edit intended use, use case and indications",
            Self::ShowReport => "Show report",
            Self::Quit => "Quit",
        }
    }
}

impl Command {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let catalog = Catalog::builtin();
        let mut session = Session::new(catalog);
        let theme = ColorfulTheme::default();
        let format = super::output_format(self.output, config);
        let labels: Vec<_> = Action::ALL.iter().map(|action| action.label()).collect();

        println!("{}", "Risk Analysis Simulator".heading());
        println!("{}", "Compliant with ISO 14971".dim());

        loop {
            print_scores(&session, config.precision());

            let choice = Select::with_theme(&theme)
                .with_prompt("What next?")
                .items(&labels)
                .default(0)
                .interact()?;
            let action = Action::ALL[choice];
            debug!(?action, "menu action");

            match action {
                Action::ToggleHazard => {
                    if let Some(record) =
                        pick(&theme, "Hazard", catalog.hazards(), session.hazards())?
                    {
                        report_toggle(record, session.toggle_hazard(record));
                    }
                }
                Action::ToggleFaultTreeEvent => {
                    if let Some(record) = pick(
                        &theme,
                        "Fault tree event",
                        catalog.fault_tree_events(),
                        session.fault_tree_events(),
                    )? {
                        report_toggle(record, session.toggle_fault_tree_event(record));
                    }
                }
                Action::ToggleRiskControlMeasure => {
                    if let Some(record) = pick(
                        &theme,
                        "Risk control measure",
                        catalog.risk_control_measures(),
                        session.risk_control_measures(),
                    )? {
                        report_toggle(record, session.toggle_risk_control_measure(record));
                    }
                }
                Action::ComputeInitial => {
                    session.compute_initial_risk_score();
                }
                Action::ComputeFinal => {
                    session.compute_final_risk_score();
                }
                Action::EditContext => edit_context(&theme, &mut session)?,
                Action::ShowReport => {
                    let report = Report::from_session(&session);
                    println!();
                    match format {
                        ReportFormat::Text => print!("{}", report.text(config.precision())),
                        ReportFormat::Json => println!("{}", report.to_json()?),
                    }
                }
                Action::Quit => break,
            }
        }

        Ok(())
    }
}

/// Prompts for one record of a catalog. Selected records are ticked.
///
/// Returns `None` if the user backs out with escape.
fn pick<'a, R: Record>(
    theme: &ColorfulTheme,
    prompt: &str,
    records: &'a [R],
    selection: &Selection<'_, R>,
) -> anyhow::Result<Option<&'a R>> {
    let items: Vec<String> = records
        .iter()
        .map(|record| {
            let mark = if selection.contains(record.id()) {
                "[x]"
            } else {
                "[ ]"
            };
            format!("{mark} {}", record.name())
        })
        .collect();

    let choice = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|index| &records[index]))
}

fn report_toggle<R: Record>(record: &R, toggle: Toggle) {
    match toggle {
        Toggle::Selected => println!("{}", format!("Selected {}", record.name()).success()),
        Toggle::Deselected => println!("{}", format!("Deselected {}", record.name()).dim()),
    }
}

fn edit_context(theme: &ColorfulTheme, session: &mut Session<'_>) -> anyhow::Result<()> {
    let context = &mut session.context;
    for (prompt, field) in [
        ("Intended use", &mut context.intended_use),
        ("Use case", &mut context.use_case),
        ("Indications for use", &mut context.indications_for_use),
    ] {
        *field = Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .with_initial_text(field.as_str())
            .allow_empty(true)
            .interact_text()?;
    }
    Ok(())
}

fn print_scores(session: &Session<'_>, precision: usize) {
    let scores = session.scores();
    println!();
    println!(
        "Initial risk score: {}   Final risk score: {}",
        format_score(scores.initial(), precision),
        format_score(scores.final_score(), precision)
    );
    if session.scores_are_stale() {
        println!(
            "{}",
            "Selection changed since the scores were calculated".warning()
        );
    }
}
