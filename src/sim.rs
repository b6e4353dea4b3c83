//! Single-agent episode simulation over a level grid

pub mod action;
pub mod config;
pub mod simulator;

pub use action::Action;
pub use config::{ObservationWindow, RewardMode, SimulatorConfig};
pub use simulator::{EpisodeStatus, Simulator, StepOutcome};
