//! Training pipeline: N training episodes then M evaluation episodes per level

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::runner::{EpisodeOptions, EpisodeReport, EpisodeRunner};
use crate::{
    Result,
    app::config::check_unit_interval,
    level::Grid,
    ports::{Learner, Observer},
    sim::{EpisodeStatus, SimulatorConfig},
};

/// Training configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of learning episodes per level
    pub train_episodes: usize,

    /// Number of evaluation episodes per level, run after training
    pub eval_episodes: usize,

    /// Exploration rate during evaluation
    pub eval_epsilon: f64,

    /// Random seed
    pub seed: Option<u64>,

    /// Keep the learner's update hooks active while evaluating
    pub learn_during_evaluation: bool,

    /// Simulator settings shared by every level of the run
    pub simulator: SimulatorConfig,
}

impl TrainingConfig {
    pub const DEFAULT_TRAIN_EPISODES: usize = 10_000;
    pub const DEFAULT_EVAL_EPISODES: usize = 100;

    pub fn with_train_episodes(mut self, episodes: usize) -> Self {
        self.train_episodes = episodes;
        self
    }

    pub fn with_eval_episodes(mut self, episodes: usize) -> Self {
        self.eval_episodes = episodes;
        self
    }

    pub fn with_eval_epsilon(mut self, epsilon: f64) -> Self {
        self.eval_epsilon = epsilon;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_learning_during_evaluation(mut self, learn: bool) -> Self {
        self.learn_during_evaluation = learn;
        self
    }

    pub fn with_simulator(mut self, simulator: SimulatorConfig) -> Self {
        self.simulator = simulator;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_unit_interval("evaluation epsilon", self.eval_epsilon)?;
        self.simulator.validate()
    }

    /// Random generator for a whole run: seeded if a seed is configured,
    /// otherwise drawn from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            train_episodes: Self::DEFAULT_TRAIN_EPISODES,
            eval_episodes: Self::DEFAULT_EVAL_EPISODES,
            eval_epsilon: 0.0,
            seed: None,
            learn_during_evaluation: false,
            simulator: SimulatorConfig::default(),
        }
    }
}

/// Aggregate outcome of one phase (training or evaluation) on one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub episodes: usize,
    pub goals: usize,
    pub deaths: usize,
    pub timeouts: usize,
    pub goal_rate: f64,
    pub mean_turns: f64,
    /// Rightmost column reached in any episode of the phase
    pub best_x: i32,
}

impl PhaseSummary {
    /// Summarise a sequence of episode reports.
    pub fn from_reports<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = &'a EpisodeReport>,
    {
        let mut summary = Self::default();
        let mut total_turns = 0u64;
        for report in reports {
            summary.episodes += 1;
            total_turns += u64::from(report.turns);
            summary.best_x = summary.best_x.max(report.best_x);
            match report.status {
                EpisodeStatus::Goal => summary.goals += 1,
                EpisodeStatus::Death => summary.deaths += 1,
                EpisodeStatus::TimedOut => summary.timeouts += 1,
                EpisodeStatus::Running => {}
            }
        }
        if summary.episodes > 0 {
            summary.goal_rate = summary.goals as f64 / summary.episodes as f64;
            summary.mean_turns = total_turns as f64 / summary.episodes as f64;
        }
        summary
    }
}

/// Result of training and evaluating on one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelReport {
    /// Level name, usually the file it was loaded from
    pub level: String,
    pub training: PhaseSummary,
    pub evaluation: PhaseSummary,
}

/// Result of a multi-level run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Learner name
    pub learner: String,
    pub config: TrainingConfig,
    pub levels: Vec<LevelReport>,
    /// Number of fingerprints in the value table at the end of the run.
    ///
    /// Greedy lookups during evaluation also materialise all-zero rows, so
    /// this counts states seen in either phase.
    pub table_size: usize,
}

impl TrainingReport {
    /// Evaluation goals summed over every level
    pub fn evaluation_goals(&self) -> usize {
        self.levels.iter().map(|level| level.evaluation.goals).sum()
    }

    /// Save report to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load report from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}

/// Training pipeline for a single persistent learner
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train and then evaluate `learner` on one level.
    ///
    /// Training episodes explore at the learner's own ε; evaluation episodes
    /// explore at the configured evaluation ε with learning switched off
    /// unless `learn_during_evaluation` is set.
    pub fn run(
        &mut self,
        level: &str,
        grid: &Grid,
        learner: &mut dyn Learner,
        rng: &mut StdRng,
    ) -> Result<LevelReport> {
        self.config.validate()?;
        let runner = EpisodeRunner::new(grid, self.config.simulator)?;

        tracing::info!(
            level,
            learner = learner.name(),
            width = grid.width(),
            height = grid.height(),
            train_episodes = self.config.train_episodes,
            eval_episodes = self.config.eval_episodes,
            "starting level"
        );

        let total = self.config.train_episodes + self.config.eval_episodes;
        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        let training_options = EpisodeOptions::training(learner.epsilon());
        let mut reports = Vec::with_capacity(self.config.train_episodes);
        for episode in 0..self.config.train_episodes {
            reports.push(runner.run_episode(
                episode,
                learner,
                training_options,
                rng,
                &mut self.observers,
            )?);
        }
        let training = PhaseSummary::from_reports(&reports);
        tracing::info!(
            level,
            goals = training.goals,
            deaths = training.deaths,
            timeouts = training.timeouts,
            states = learner.table().len(),
            "training phase finished"
        );

        let evaluation_options = EpisodeOptions::evaluation(self.config.eval_epsilon)
            .with_learning(self.config.learn_during_evaluation);
        reports.clear();
        for episode in self.config.train_episodes..total {
            reports.push(runner.run_episode(
                episode,
                learner,
                evaluation_options,
                rng,
                &mut self.observers,
            )?);
        }
        let evaluation = PhaseSummary::from_reports(&reports);
        tracing::info!(
            level,
            goals = evaluation.goals,
            episodes = evaluation.episodes,
            goal_rate = evaluation.goal_rate,
            "evaluation phase finished"
        );
        if evaluation.episodes > 0 && evaluation.goals == 0 {
            tracing::warn!(
                level,
                best_x = evaluation.best_x,
                "no evaluation episode reached the goal"
            );
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        Ok(LevelReport {
            level: level.to_string(),
            training,
            evaluation,
        })
    }

    /// Run a curriculum of levels in order with one persistent learner.
    ///
    /// The learner's value table carries over from level to level, and a
    /// single random generator built from the configured seed drives the
    /// whole run.
    pub fn run_curriculum(
        &mut self,
        levels: &[(String, Grid)],
        learner: &mut dyn Learner,
    ) -> Result<TrainingReport> {
        self.config.validate()?;
        let mut rng = self.config.rng();

        let mut reports = Vec::with_capacity(levels.len());
        for (name, grid) in levels {
            reports.push(self.run(name, grid, learner, &mut rng)?);
        }

        Ok(TrainingReport {
            learner: learner.name().to_string(),
            config: self.config,
            levels: reports,
            table_size: learner.table().len(),
        })
    }
}
