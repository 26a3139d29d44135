//! End-to-end behaviour of the night engine through the public API.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use seeing_schedule::config::NightConfig;
use seeing_schedule::dispatching::{ForecastAware, Forecaster, Reactive};
use seeing_schedule::models::{
    NightEvent, Program, ProgramRegistry, RegistryPlan, SeeingBin, Termination,
};
use seeing_schedule::scheduler::{compare_policies, Night};
use seeing_schedule::seeing::{SeeingClassifier, SeeingSeries, SeriesGenerator};

fn classifier() -> SeeingClassifier {
    SeeingClassifier::new([0.5, 0.7, 0.9]).unwrap()
}

#[test]
fn degenerate_forecast_window_falls_back_to_current_value() {
    let series = SeeingSeries::new((0..600).map(|i| 0.5 + i as f64 / 1000.0).collect());
    let forecaster = Forecaster::new(&NightConfig::default().with_lookahead(30, 10)).unwrap();

    assert_eq!(forecaster.window(595, 600), None);
    let sample = forecaster.forecast(595, 600, &series, &mut StdRng::seed_from_u64(0));
    assert_eq!(sample.mean, Some(series.at(595)));
    assert_eq!(sample.uncertainty, 0.0);
}

#[test]
fn improving_forecast_starts_scan_from_better_bin() {
    // Fair (rank 2) now, Excellent (rank 0) for the rest of the night.
    let mut values = vec![0.4; 600];
    values[0] = 0.8;
    let registry = ProgramRegistry::new(vec![
        Program::imaging("fair", SeeingBin::Fair, 40),
        Program::imaging("excellent", SeeingBin::Excellent, 40),
    ]);
    let config = NightConfig::default().with_max_uncertainty(0.0);

    let series = SeeingSeries::new(values);
    let mut night = Night::new(config.clone(), classifier(), series, registry).unwrap();
    night.step(&mut ForecastAware::seeded(&config, 5).unwrap());

    match &night.events()[0] {
        NightEvent::Executed { program, .. } => assert_eq!(program.id, "excellent"),
        other => panic!("expected an execution, got {other:?}"),
    }
}

#[test]
fn oversized_registry_stalls_after_retry_budget() {
    let registry = ProgramRegistry::new(vec![
        Program::imaging("a", SeeingBin::Excellent, 650),
        Program::spectroscopy("b", SeeingBin::Poor, 700),
    ]);
    let mut night = Night::new(
        NightConfig::default(),
        classifier(),
        SeeingSeries::constant(0.6, 600),
        registry,
    )
    .unwrap();

    let summary = night.run(&mut Reactive);
    assert_eq!(summary.completed, 0);
    assert_eq!(summary.termination, Some(Termination::RetriesExhausted));
    assert_eq!(night.current_minute(), 50);
    assert_eq!(night.events().iter().filter(|e| e.is_retry()).count(), 50);
}

#[test]
fn requirement_tally_compares_delivered_seeing_with_bin_bound() {
    let c = classifier();
    let upper = c.upper_bound(SeeingBin::Excellent);

    // Below the bound throughout.
    let registry = ProgramRegistry::new(vec![Program::imaging("good", SeeingBin::Excellent, 60)]);
    let series = SeeingSeries::constant(upper - 0.1, 600);
    let mut night = Night::new(NightConfig::default(), c, series, registry).unwrap();
    night.run(&mut Reactive);
    assert_eq!(night.registry().get(0).unwrap().met_requirement(), Some(true));

    // Excellent only at the decision minute, then above the bound.
    let mut values = vec![upper + 0.2; 600];
    values[0] = upper - 0.1;
    let registry = ProgramRegistry::new(vec![Program::imaging("bad", SeeingBin::Excellent, 60)]);
    let series = SeeingSeries::new(values);
    let mut night = Night::new(NightConfig::default(), c, series, registry).unwrap();
    let summary = night.run(&mut Reactive);
    assert_eq!(night.registry().get(0).unwrap().met_requirement(), Some(false));
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.passed, 0);
}

#[test]
fn generated_night_keeps_invariants_under_both_policies() {
    let config = NightConfig::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let classifier = SeeingClassifier::for_config(&config, &mut rng).unwrap();
    let series = SeriesGenerator::from_config(600, &config).generate(&mut rng).unwrap();
    let registry = ProgramRegistry::generate(&RegistryPlan::default(), &config.overheads, &mut rng);

    let cmp = compare_policies(&config, classifier, Arc::new(series), &registry, 99).unwrap();
    for report in [&cmp.baseline, &cmp.forecast] {
        let executed: Vec<&str> = report
            .executions()
            .filter_map(|e| match e {
                NightEvent::Executed { program, .. } => Some(program.id.as_str()),
                _ => None,
            })
            .collect();
        let mut unique = executed.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), executed.len(), "a program ran twice");

        let end = report
            .events
            .iter()
            .find_map(|e| match e {
                NightEvent::NightEnd {
                    remaining_minutes, ..
                } => Some(*remaining_minutes),
                _ => None,
            })
            .unwrap();
        let elapsed = report.total_minutes - end;
        assert_eq!(report.forecast_trace.len() as u32, elapsed);
        assert_eq!(
            report.summary.passed + report.summary.failed,
            report.summary.completed
        );
        assert!(report.summary.busy_minutes <= report.total_minutes);
    }
}

#[test]
fn same_seeds_reproduce_the_comparison() {
    let config = NightConfig::default();
    let build = || {
        let mut rng = StdRng::seed_from_u64(8);
        let classifier = SeeingClassifier::for_config(&config, &mut rng).unwrap();
        let series = SeriesGenerator::from_config(600, &config).generate(&mut rng).unwrap();
        let plan = RegistryPlan::default();
        let registry = ProgramRegistry::generate(&plan, &config.overheads, &mut rng);
        compare_policies(&config, classifier, Arc::new(series), &registry, 17).unwrap()
    };
    let a = build();
    let b = build();
    assert_eq!(a.baseline, b.baseline);
    assert_eq!(a.forecast, b.forecast);
}
