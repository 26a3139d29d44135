//! Runs the reactive baseline and the forecast-aware scheduler over one
//! simulated night and prints both logs.
//!
//! Usage: `compare_nights [SEED] [MINUTES]`
//!
//! Set `RUST_LOG=debug` to trace every decision.

use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seeing_schedule::config::NightConfig;
use seeing_schedule::models::{ProgramRegistry, RegistryPlan};
use seeing_schedule::dispatching::{ForecastAware, Reactive, SelectionPolicy};
use seeing_schedule::scheduler::compare_with;
use seeing_schedule::seeing::{SeeingClassifier, SeriesGenerator};
use seeing_schedule::SetupResult;

fn parse_arg<T: FromStr>(arg: Option<String>, default: T, name: &str) -> Result<T, String> {
    match arg {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| format!("invalid {name}: {raw}")),
    }
}

fn run(seed: u64, minutes: usize) -> SetupResult<()> {
    let config = NightConfig::default();

    let mut rng = StdRng::seed_from_u64(seed);
    let classifier = SeeingClassifier::for_config(&config, &mut rng)?;
    let series = SeriesGenerator::from_config(minutes, &config).generate(&mut rng)?;
    let registry = ProgramRegistry::generate(&RegistryPlan::default(), &config.overheads, &mut rng);
    let mut baseline = Reactive;
    let mut forecast = ForecastAware::seeded(&config, rng.random())?;

    let cmp = compare_with(
        &config,
        classifier,
        Arc::new(series),
        &registry,
        &mut baseline,
        &mut forecast,
    )?;

    println!("\n{}:", baseline.description());
    print!("{}", cmp.baseline);
    println!("\n{}:", forecast.description());
    print!("{}", cmp.forecast);
    println!(
        "\nPassed: baseline {} vs forecast-aware {} ({:+})",
        cmp.baseline.summary.passed,
        cmp.forecast.summary.passed,
        cmp.pass_gain()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let parsed = parse_arg(args.next(), 0u64, "seed")
        .and_then(|seed| parse_arg(args.next(), 600usize, "minutes").map(|m| (seed, m)));
    let (seed, minutes) = match parsed {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}\nusage: compare_nights [SEED] [MINUTES]");
            return ExitCode::FAILURE;
        }
    };

    match run(seed, minutes) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
