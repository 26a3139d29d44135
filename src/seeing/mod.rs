//! Seeing conditions: the night's time series, bin classification and
//! forecast uncertainty.
//!
//! # Usage
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use seeing_schedule::config::NightConfig;
//! use seeing_schedule::seeing::{SeeingClassifier, SeriesGenerator, UncertaintyModel};
//!
//! let config = NightConfig::default();
//! let mut rng = StdRng::seed_from_u64(1);
//! let classifier = SeeingClassifier::for_config(&config, &mut rng).unwrap();
//! let series = SeriesGenerator::from_config(600, &config).generate(&mut rng).unwrap();
//! let sigma = UncertaintyModel::from_config(&config);
//!
//! let _bin = classifier.classify(series.at(0));
//! assert!(sigma.sigma(30) > sigma.sigma(10));
//! ```

mod classifier;
mod series;
mod uncertainty;

pub use classifier::{percentile, SeeingClassifier};
pub use series::{SeeingSeries, SeriesGenerator};
pub use uncertainty::UncertaintyModel;
