use clap::Parser;
use risksim::{
    Catalog, Config, RecordId, Report, ReportFormat, Session, Toggle,
    domain::{Category, UnknownRecordError},
};
use tracing::{info, instrument};

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "Compute initial and final risk scores for a selection")]
pub struct Assess {
    /// Hazard ids to toggle, in order (e.g. --hazard 1,2)
    #[arg(long = "hazard", value_name = "ID", value_delimiter = ',')]
    hazards: Vec<RecordId>,

    /// Fault tree event ids to toggle, in order
    #[arg(long = "event", value_name = "ID", value_delimiter = ',')]
    events: Vec<RecordId>,

    /// Risk control measure ids to toggle, in order
    #[arg(long = "measure", value_name = "ID", value_delimiter = ',')]
    measures: Vec<RecordId>,

    /// The intended use of the device
    #[arg(long, default_value = "")]
    intended_use: String,

    /// The use case being analysed
    #[arg(long, default_value = "")]
    use_case: String,

    /// The indications for use
    #[arg(long = "indications", default_value = "")]
    indications_for_use: String,

    /// Compute only the initial risk score
    #[arg(long)]
    skip_final: bool,

    /// Output format (text, json); defaults to the configured format
    #[arg(long, value_name = "FORMAT")]
    output: Option<ReportFormat>,
}

impl Assess {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let session = self.session()?;

        let report = Report::from_session(&session);
        match super::output_format(self.output, config) {
            ReportFormat::Json => println!("{}", report.to_json()?),
            ReportFormat::Text => {
                print!("{}", report.text(config.precision()));
                if self.skip_final {
                    println!("{}", "Final risk score not computed (--skip-final)".dim());
                } else if session.risk_control_measures().is_empty() {
                    println!(
                        "{}",
                        "No risk control measures selected; final score equals initial score"
                            .warning()
                    );
                }
            }
        }

        Ok(())
    }

    /// Applies the requested toggles in order and computes the scores.
    pub(super) fn session(&self) -> Result<Session<'static>, UnknownRecordError> {
        let mut session = Session::new(Catalog::builtin());
        session.context.intended_use.clone_from(&self.intended_use);
        session.context.use_case.clone_from(&self.use_case);
        session
            .context
            .indications_for_use
            .clone_from(&self.indications_for_use);

        for &id in &self.hazards {
            log_toggle(Category::Hazard, id, session.toggle_hazard_by_id(id)?);
        }
        for &id in &self.events {
            log_toggle(
                Category::FaultTreeEvent,
                id,
                session.toggle_fault_tree_event_by_id(id)?,
            );
        }
        for &id in &self.measures {
            log_toggle(
                Category::RiskControlMeasure,
                id,
                session.toggle_risk_control_measure_by_id(id)?,
            );
        }

        session.compute_initial_risk_score();
        if !self.skip_final {
            session.compute_final_risk_score();
        }
        Ok(session)
    }
}

fn log_toggle(category: Category, id: RecordId, toggle: Toggle) {
    match toggle {
        Toggle::Selected => info!("Selected {category} {id}"),
        Toggle::Deselected => info!("Deselected {category} {id}"),
    }
}

#[cfg(test)]
mod tests {
    use risksim::domain::Phase;

    use super::*;

    fn assess(hazards: &[RecordId], events: &[RecordId], measures: &[RecordId]) -> Assess {
        Assess {
            hazards: hazards.to_vec(),
            events: events.to_vec(),
            measures: measures.to_vec(),
            ..Assess::default()
        }
    }

    #[test]
    fn session_computes_both_scores() {
        let session = assess(&[1, 2], &[1], &[1, 2]).session().unwrap();

        assert_eq!(session.hazards().len(), 2);
        assert_eq!(session.scores().phase(), Phase::Final);
        assert!((session.scores().initial() - 0.035).abs() < 1e-12);
        assert!((session.scores().final_score() - 0.008_75).abs() < 1e-12);
        assert!(!session.scores_are_stale());
    }

    #[test]
    fn run_fails_on_unknown_id() {
        let error = assess(&[1], &[], &[9]).run(&Config::default()).unwrap_err();

        let unknown = error
            .downcast_ref::<UnknownRecordError>()
            .expect("expected an unknown record error");
        assert_eq!(unknown.category, Category::RiskControlMeasure);
        assert_eq!(unknown.id, 9);
    }

    #[test]
    fn repeated_id_toggles_back_off() {
        let session = assess(&[1, 1], &[], &[]).session().unwrap();

        assert!(session.hazards().is_empty());
        assert_eq!(session.scores().initial(), 0.0);
    }

    #[test]
    fn skip_final_computes_only_the_initial_score() {
        let command = Assess {
            skip_final: true,
            ..assess(&[3], &[], &[1])
        };

        let session = command.session().unwrap();

        assert_eq!(session.scores().phase(), Phase::Initial);
        assert!((session.scores().initial() - 0.05).abs() < 1e-12);
        assert_eq!(session.scores().final_score(), 0.0);
    }

    #[test]
    fn context_is_copied_into_the_session() {
        let command = Assess {
            intended_use: "Infusion pump".to_string(),
            indications_for_use: "Adults".to_string(),
            ..Assess::default()
        };

        let session = command.session().unwrap();

        assert_eq!(session.context.intended_use, "Infusion pump");
        assert_eq!(session.context.use_case, "");
        assert_eq!(session.context.indications_for_use, "Adults");
    }
}
