//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the episode loop
//! to specific output formats or metrics.

use crate::{
    Result,
    pipeline::{EpisodePhase, EpisodeReport, StepRecord},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during a run.
/// Examples include:
/// - Progress bars for user feedback
/// - JSONL export for analysis
/// - Metrics tracking for evaluation
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - Once per level
/// 2. For each episode (training first, then evaluation):
///    - `on_episode_start(episode, phase)`
///    - `on_step(episode, record)` - For each turn of the episode
///    - `on_episode_end(episode, report)`
/// 3. `on_training_end()` - Once per level, after the last evaluation episode
///
/// Episode numbers count across both phases, starting at 0.
///
/// # Examples
///
/// ```no_run
/// use aqtion::{pipeline::EpisodeReport, ports::Observer};
///
/// struct GoalCounter {
///     goals: usize,
/// }
///
/// impl Observer for GoalCounter {
///     fn on_episode_end(&mut self, _episode: usize, report: &EpisodeReport) -> aqtion::Result<()> {
///         if report.status.is_goal() {
///             self.goals += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when a level's run starts.
    ///
    /// # Parameters
    ///
    /// * `total_episodes` - Training plus evaluation episodes about to run
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to reset per-episode state.
    fn on_episode_start(&mut self, _episode: usize, _phase: EpisodePhase) -> Result<()> {
        Ok(())
    }

    /// Called after every turn, once the learner has observed it.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to observe individual decisions.
    fn on_step(&mut self, _episode: usize, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, after any episode-level learning.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to record episode outcomes.
    fn on_episode_end(&mut self, _episode: usize, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called when a level's run completes.
    ///
    /// Use this to finalize outputs, flush files, or display summaries.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
