//! Training and evaluation pipeline
//!
//! This module provides:
//! - An episode runner driving the simulator and any learner turn by turn
//! - A training pipeline running training then evaluation episodes per level
//! - Observers recording progress, metrics and step traces

pub mod observers;
pub mod runner;
pub mod training;

pub use observers::{JsonlObserver, MetricsObserver, MetricsSummary, Observation, ProgressObserver};
pub use runner::{EpisodeOptions, EpisodePhase, EpisodeReport, EpisodeRunner, StepRecord};
pub use training::{LevelReport, PhaseSummary, TrainingConfig, TrainingPipeline, TrainingReport};

pub use crate::ports::{Learner, Observer};
