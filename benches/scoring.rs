//! This bench measures a full session: toggling every catalog record on and
//! off repeatedly, then computing both risk scores.

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use risksim::{Catalog, Report, Session};

fn toggle_and_score(c: &mut Criterion) {
    let catalog = Catalog::builtin();

    c.bench_function("toggle and score", |b| {
        b.iter(|| {
            let mut session = Session::new(catalog);
            for _ in 0..3 {
                for hazard in catalog.hazards() {
                    session.toggle_hazard(hazard);
                }
                for event in catalog.fault_tree_events() {
                    session.toggle_fault_tree_event(event);
                }
                for measure in catalog.risk_control_measures() {
                    session.toggle_risk_control_measure(measure);
                }
            }
            session.compute_initial_risk_score();
            std::hint::black_box(session.compute_final_risk_score())
        });
    });
}

fn render_report(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let mut session = Session::new(catalog);
    for hazard in catalog.hazards() {
        session.toggle_hazard(hazard);
    }
    for measure in catalog.risk_control_measures() {
        session.toggle_risk_control_measure(measure);
    }
    session.compute_initial_risk_score();
    session.compute_final_risk_score();

    c.bench_function("render text report", |b| {
        b.iter(|| std::hint::black_box(Report::from_session(&session).to_text(6)));
    });
}

criterion_group!(benches, toggle_and_score, render_report);
criterion_main!(benches);
