//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the episode loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::runner::{EpisodePhase, EpisodeReport, StepRecord};
use crate::{Error, Result, ports::Observer, sim::EpisodeStatus};

/// Complete observation of one episode, written as a single JSONL line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Episode number within the level run
    pub episode: usize,
    pub phase: EpisodePhase,
    /// Final status
    pub outcome: EpisodeStatus,
    pub turns: u32,
    pub reward: f64,
    pub best_x: i32,
    /// Turns in the episode
    pub steps: Vec<StepRecord>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    goals: usize,
    deaths: usize,
    timeouts: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            goals: 0,
            deaths: 0,
            timeouts: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} D:{} T:{}", self.goals, self.deaths, self.timeouts)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.goals = 0;
        self.deaths = 0;
        self.timeouts = 0;

        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (G:{msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        match report.status {
            EpisodeStatus::Goal => self.goals += 1,
            EpisodeStatus::Death => self.deaths += 1,
            EpisodeStatus::TimedOut => self.timeouts += 1,
            EpisodeStatus::Running => {}
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks episode outcomes across a run
///
/// Counts accumulate over every level the observer sees; only evaluation or
/// training episodes can be selected with [`MetricsObserver::for_phase`].
pub struct MetricsObserver {
    phase: Option<EpisodePhase>,
    goals: usize,
    deaths: usize,
    timeouts: usize,
    total_episodes: usize,
    episode_lengths: Vec<u32>,
    current_turns: u32,
}

impl MetricsObserver {
    /// Create a new metrics observer counting every episode
    pub fn new() -> Self {
        Self {
            phase: None,
            goals: 0,
            deaths: 0,
            timeouts: 0,
            total_episodes: 0,
            episode_lengths: Vec::new(),
            current_turns: 0,
        }
    }

    /// Create a metrics observer that ignores episodes of other phases
    pub fn for_phase(phase: EpisodePhase) -> Self {
        Self {
            phase: Some(phase),
            ..Self::new()
        }
    }

    fn tracks(&self, phase: EpisodePhase) -> bool {
        self.phase.is_none_or(|tracked| tracked == phase)
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            count as f64 / self.total_episodes as f64
        }
    }

    /// Get current goal rate
    pub fn goal_rate(&self) -> f64 {
        self.rate(self.goals)
    }

    /// Get current death rate
    pub fn death_rate(&self) -> f64 {
        self.rate(self.deaths)
    }

    /// Get current timeout rate
    pub fn timeout_rate(&self) -> f64 {
        self.rate(self.timeouts)
    }

    /// Get average episode length in turns
    pub fn avg_episode_length(&self) -> f64 {
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            self.episode_lengths.iter().map(|&t| f64::from(t)).sum::<f64>()
                / self.episode_lengths.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            goals: self.goals,
            deaths: self.deaths,
            timeouts: self.timeouts,
            goal_rate: self.goal_rate(),
            death_rate: self.death_rate(),
            timeout_rate: self.timeout_rate(),
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

/// Summary of episode metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub goals: usize,
    pub deaths: usize,
    pub timeouts: usize,
    pub goal_rate: f64,
    pub death_rate: f64,
    pub timeout_rate: f64,
    pub avg_episode_length: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_start(&mut self, _episode: usize, _phase: EpisodePhase) -> Result<()> {
        self.current_turns = 0;
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _record: &StepRecord) -> Result<()> {
        self.current_turns += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, report: &EpisodeReport) -> Result<()> {
        if !self.tracks(report.phase) {
            return Ok(());
        }
        self.total_episodes += 1;
        self.episode_lengths.push(self.current_turns);
        match report.status {
            EpisodeStatus::Goal => self.goals += 1,
            EpisodeStatus::Death => self.deaths += 1,
            EpisodeStatus::TimedOut => self.timeouts += 1,
            EpisodeStatus::Running => {}
        }
        Ok(())
    }
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepRecord>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create observation file {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize, _phase: EpisodePhase) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, record: &StepRecord) -> Result<()> {
        self.current_steps.push(record.clone());
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, report: &EpisodeReport) -> Result<()> {
        let observation = Observation {
            episode,
            phase: report.phase,
            outcome: report.status,
            turns: report.turns,
            reward: report.reward,
            best_x: report.best_x,
            steps: std::mem::take(&mut self.current_steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
