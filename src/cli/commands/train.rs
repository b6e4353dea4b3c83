//! Train command - Train a learner on one or more levels, then evaluate it

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{
    app::{LearningRule, create_learner},
    cli::{config::RunConfig, output},
    level::Grid,
    pipeline::{JsonlObserver, ProgressObserver, TrainingPipeline},
    sim::{ObservationWindow, RewardMode},
};

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RuleArg {
    /// Bootstrapped Q-learning update after every turn
    OneStep,
    /// Terminal reward propagated backwards at episode end
    EpisodeBackward,
}

impl From<RuleArg> for LearningRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::OneStep => LearningRule::OneStep,
            RuleArg::EpisodeBackward => LearningRule::EpisodeBackward,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RewardArg {
    /// Reward tracks horizontal progress
    Progress,
    /// Reward only at the goal or on death
    Terminal,
}

impl From<RewardArg> for RewardMode {
    fn from(reward: RewardArg) -> Self {
        match reward {
            RewardArg::Progress => RewardMode::Progress,
            RewardArg::Terminal => RewardMode::Terminal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a learner on a sequence of levels", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Level files, trained in order with one persistent value table
    #[arg(required = true)]
    pub levels: Vec<PathBuf>,

    /// JSON run configuration; explicit flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Training episodes per level
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Evaluation episodes per level
    #[arg(long)]
    pub eval_episodes: Option<usize>,

    /// Credit-assignment rule
    #[arg(long, value_enum)]
    pub rule: Option<RuleArg>,

    /// Learning rate α (0.0-1.0)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ (0.0-1.0)
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate ε while training (0.0-1.0)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Exploration rate ε while evaluating (0.0-1.0)
    #[arg(long)]
    pub eval_epsilon: Option<f64>,

    /// Keep learning during evaluation episodes
    #[arg(long, default_value_t = false)]
    pub learn_during_eval: bool,

    /// Observation window height in rows
    #[arg(long)]
    pub window_height: Option<usize>,

    /// Observation window look-ahead in columns
    #[arg(long)]
    pub window_width: Option<usize>,

    /// Reward shaping
    #[arg(long, value_enum)]
    pub reward: Option<RewardArg>,

    /// Rows a jump tries to rise
    #[arg(long)]
    pub jump_height: Option<u32>,

    /// Turn ceiling per episode
    #[arg(long, conflicts_with = "no_turn_limit")]
    pub max_turns: Option<u32>,

    /// Let episodes run until a terminal tile is reached
    #[arg(long, default_value_t = false)]
    pub no_turn_limit: bool,

    /// Strict level height; shorter levels are padded with blank rows on top
    #[arg(long)]
    pub level_height: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Print the learned value table after the run
    #[arg(long, default_value_t = false)]
    pub show_table: bool,
}

impl TrainArgs {
    /// Overlay explicitly given flags onto `config`.
    pub fn apply(&self, config: &mut RunConfig) {
        let agent = &mut config.agent;
        if let Some(rule) = self.rule {
            agent.rule = rule.into();
        }
        if let Some(alpha) = self.alpha {
            agent.learning_rate = alpha;
        }
        if let Some(gamma) = self.gamma {
            agent.discount_factor = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            agent.epsilon = epsilon;
        }

        let training = &mut config.training;
        if let Some(episodes) = self.episodes {
            training.train_episodes = episodes;
        }
        if let Some(episodes) = self.eval_episodes {
            training.eval_episodes = episodes;
        }
        if let Some(epsilon) = self.eval_epsilon {
            training.eval_epsilon = epsilon;
        }
        if self.learn_during_eval {
            training.learn_during_evaluation = true;
        }
        if let Some(seed) = self.seed {
            training.seed = Some(seed);
        }

        let simulator = &mut training.simulator;
        if self.window_height.is_some() || self.window_width.is_some() {
            simulator.window = ObservationWindow::new(
                self.window_height.unwrap_or(simulator.window.height),
                self.window_width.unwrap_or(simulator.window.width),
            );
        }
        if let Some(reward) = self.reward {
            simulator.reward_mode = reward.into();
        }
        if let Some(jump_height) = self.jump_height {
            simulator.jump_height = jump_height;
        }
        if let Some(max_turns) = self.max_turns {
            simulator.max_turns = Some(max_turns);
        }
        if self.no_turn_limit {
            simulator.max_turns = None;
        }

        if let Some(height) = self.level_height {
            config.level_height = Some(height);
        }
    }

    /// Run configuration from `--config` (or defaults) with flags applied.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("failed to load run config {}", path.display()))?,
            None => RunConfig::default(),
        };
        self.apply(&mut config);
        config.validate().context("invalid run configuration")?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.resolve()?;

    let summary_spec = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let grid_options = config.grid_options();
    let levels = args
        .levels
        .iter()
        .map(|path| {
            Grid::load(path, &grid_options)
                .map(|grid| (path.display().to_string(), grid))
                .with_context(|| format!("failed to load level {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut learner = create_learner(&config.agent)?;

    let mut pipeline = TrainingPipeline::new(config.training);
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to open observation file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let report = pipeline.run_curriculum(&levels, learner.as_mut())?;

    for level in &report.levels {
        println!(
            "{}: {} of {} evaluation episodes reached the goal",
            level.level, level.evaluation.goals, level.evaluation.episodes
        );
    }
    output::print_report(&report);

    if args.show_table {
        output::print_section("Value Table");
        print!("{}", learner.table());
    }

    if let Some((summary_path, normalized)) = summary_spec {
        if normalized {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }

        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        report
            .save(&summary_path)
            .with_context(|| format!("failed to write summary {}", summary_path.display()))?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.txt")),
            PathBuf::from("out/run.json")
        );
    }

    #[test]
    fn test_flags_override_config() {
        let args = TrainArgs::parse_from([
            "train",
            "level.txt",
            "--rule",
            "episode-backward",
            "--gamma",
            "0.9",
            "--window-width",
            "3",
            "--no-turn-limit",
        ]);
        let mut config = RunConfig::default();
        config.agent.learning_rate = 0.4;
        args.apply(&mut config);

        assert_eq!(config.agent.rule, LearningRule::EpisodeBackward);
        assert_eq!(config.agent.discount_factor, 0.9);
        assert_eq!(config.agent.learning_rate, 0.4);
        assert_eq!(config.training.simulator.window, ObservationWindow::new(3, 3));
        assert_eq!(config.training.simulator.max_turns, None);
    }

    #[test]
    fn test_resolve_rejects_invalid_rates() {
        let args = TrainArgs::parse_from(["train", "level.txt", "--alpha", "1.5"]);
        assert!(args.resolve().is_err());
    }
}
