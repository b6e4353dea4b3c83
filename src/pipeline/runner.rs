//! Episode runner: plays one level episode against a learner.
//!
//! The runner owns the decide → step → learn loop. It knows nothing about
//! which learning rule sits behind the [`Learner`] port; Rule A learns inside
//! `observe`, Rule B inside `finish_episode`, and the runner calls both.

use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    level::Grid,
    ports::{Learner, Observer, Transition},
    sim::{Action, EpisodeStatus, Simulator, SimulatorConfig},
    types::{Fingerprint, Position},
};

/// Which half of a level run an episode belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodePhase {
    Training,
    Evaluation,
}

impl fmt::Display for EpisodePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodePhase::Training => f.write_str("training"),
            EpisodePhase::Evaluation => f.write_str("evaluation"),
        }
    }
}

/// How a single episode is played.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOptions {
    pub phase: EpisodePhase,
    /// Exploration rate passed to every action selection
    pub epsilon: f64,
    /// Whether the learner's update hooks are invoked
    pub learn: bool,
}

impl EpisodeOptions {
    /// Learning enabled, exploring at `epsilon`.
    pub fn training(epsilon: f64) -> Self {
        Self {
            phase: EpisodePhase::Training,
            epsilon,
            learn: true,
        }
    }

    /// Learning disabled, exploring at `epsilon`.
    pub fn evaluation(epsilon: f64) -> Self {
        Self {
            phase: EpisodePhase::Evaluation,
            epsilon,
            learn: false,
        }
    }

    pub fn with_learning(mut self, learn: bool) -> Self {
        self.learn = learn;
        self
    }
}

/// One resolved turn, as handed to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Turn number within the episode, starting at 1
    pub turn: u32,
    /// Fingerprint the action was chosen from
    pub state: Fingerprint,
    pub action: Action,
    /// Reward reported after the turn
    pub reward: f64,
    /// Agent position after the turn
    pub position: Position,
    pub status: EpisodeStatus,
}

/// Outcome of a finished episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub phase: EpisodePhase,
    pub status: EpisodeStatus,
    /// Turns played before the episode ended
    pub turns: u32,
    /// Final reward, the terminal reward handed to episode-level learners
    pub reward: f64,
    pub final_position: Position,
    /// Rightmost column the agent reached
    pub best_x: i32,
}

/// Plays episodes of one level with one simulator configuration.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeRunner<'g> {
    grid: &'g Grid,
    config: SimulatorConfig,
}

impl<'g> EpisodeRunner<'g> {
    /// Create a runner for `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(grid: &'g Grid, config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { grid, config })
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Play one episode from the level start until it ends.
    ///
    /// Each turn fingerprints the agent's surroundings, asks the learner for
    /// an action, advances the simulator, and (when `options.learn` is set)
    /// hands the transition to the learner. Episode-level learners receive
    /// the final reward once the simulator reports the episode ended.
    ///
    /// Without a turn ceiling in the simulator configuration, a level with no
    /// reachable terminal tile never returns.
    pub fn run_episode(
        &self,
        episode: usize,
        learner: &mut dyn Learner,
        options: EpisodeOptions,
        rng: &mut StdRng,
        observers: &mut [Box<dyn Observer>],
    ) -> Result<EpisodeReport> {
        for observer in observers.iter_mut() {
            observer.on_episode_start(episode, options.phase)?;
        }

        let mut sim = Simulator::new(self.grid, self.config);
        let mut state = sim.fingerprint();
        let mut best_x = sim.position().x;

        if options.learn {
            learner.begin_episode(&state)?;
        }

        while !sim.is_ended() {
            let action = learner.select_action(&state, options.epsilon, rng)?;
            let outcome = sim.step(action)?;
            let next_state = sim.fingerprint();

            if options.learn {
                learner.observe(&Transition {
                    state: &state,
                    action,
                    next_state: &next_state,
                    reward: outcome.reward,
                })?;
            }

            best_x = best_x.max(outcome.position.x);
            tracing::trace!(
                episode,
                turn = sim.turn(),
                %action,
                position = %outcome.position,
                reward = outcome.reward,
                "turn resolved"
            );

            if !observers.is_empty() {
                let record = StepRecord {
                    turn: sim.turn(),
                    state,
                    action,
                    reward: outcome.reward,
                    position: outcome.position,
                    status: outcome.status,
                };
                for observer in observers.iter_mut() {
                    observer.on_step(episode, &record)?;
                }
            }

            state = next_state;
        }

        if options.learn {
            learner.finish_episode(sim.reward())?;
        }

        let report = EpisodeReport {
            phase: options.phase,
            status: sim.status(),
            turns: sim.turn(),
            reward: sim.reward(),
            final_position: sim.position(),
            best_x,
        };

        if report.status == EpisodeStatus::TimedOut {
            tracing::debug!(
                episode,
                phase = %options.phase,
                turns = report.turns,
                x = report.final_position.x,
                "episode truncated at turn limit"
            );
        } else {
            tracing::debug!(
                episode,
                phase = %options.phase,
                status = ?report.status,
                turns = report.turns,
                reward = report.reward,
                "episode finished"
            );
        }

        for observer in observers.iter_mut() {
            observer.on_episode_end(episode, &report)?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::{
        level::GridOptions,
        q_learning::{BackwardCreditAgent, QLearningAgent},
    };

    fn corridor() -> Grid {
        Grid::parse("   \n###", &GridOptions::new()).unwrap()
    }

    #[test]
    fn test_evaluation_does_not_learn() {
        let grid = corridor();
        let runner = EpisodeRunner::new(&grid, SimulatorConfig::default().with_max_turns(20))
            .unwrap();
        let mut agent = QLearningAgent::new(0.5, 0.9, 0.1);
        let start = Simulator::new(&grid, *runner.config()).fingerprint();
        agent.q_table_mut().set(&start, Action::Move.index(), 5.0);
        let mut rng = StdRng::seed_from_u64(3);

        let report = runner
            .run_episode(0, &mut agent, EpisodeOptions::evaluation(0.0), &mut rng, &mut [])
            .unwrap();

        assert!(report.status.is_ended());
        // Greedy lookups may materialise zero rows, but nothing is updated.
        for (state, values) in agent.q_table().iter() {
            if *state == start {
                assert_eq!(values, &[0.0, 5.0, 0.0][..]);
            } else {
                assert!(values.iter().all(|&v| v == 0.0), "{state} was updated");
            }
        }
    }

    #[test]
    fn test_training_updates_table() {
        let grid = corridor();
        let runner = EpisodeRunner::new(&grid, SimulatorConfig::default().with_max_turns(20))
            .unwrap();
        let mut agent = QLearningAgent::new(0.5, 0.9, 0.1);
        let mut rng = StdRng::seed_from_u64(3);

        let report = runner
            .run_episode(0, &mut agent, EpisodeOptions::training(1.0), &mut rng, &mut [])
            .unwrap();

        assert!(report.turns >= 1);
        assert!(!agent.q_table().is_empty());
    }

    #[test]
    fn test_backward_learner_updates_after_episode() {
        let grid = corridor();
        let runner = EpisodeRunner::new(&grid, SimulatorConfig::default().with_max_turns(50))
            .unwrap();
        let mut agent = BackwardCreditAgent::new(1.0, 0.5, 0.0);
        let mut rng = StdRng::seed_from_u64(9);

        let report = runner
            .run_episode(0, &mut agent, EpisodeOptions::training(1.0), &mut rng, &mut [])
            .unwrap();

        assert!(report.turns >= 1);
        assert!(agent.trajectory().is_empty());
        assert!(!agent.q_table().is_empty());
    }

    #[test]
    fn test_turn_limit_truncates_episode() {
        let grid = corridor();
        let runner =
            EpisodeRunner::new(&grid, SimulatorConfig::default().with_max_turns(5)).unwrap();
        let mut agent = QLearningAgent::new(0.5, 0.9, 0.0);
        // Force the agent to stand still forever.
        let state = Simulator::new(&grid, *runner.config()).fingerprint();
        agent.q_table_mut().set(&state, Action::Stay.index(), 10.0);
        let mut rng = StdRng::seed_from_u64(1);

        let report = runner
            .run_episode(0, &mut agent, EpisodeOptions::evaluation(0.0), &mut rng, &mut [])
            .unwrap();

        assert_eq!(report.status, EpisodeStatus::TimedOut);
        assert_eq!(report.turns, 5);
        assert_eq!(report.best_x, 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let grid = corridor();
        let config = SimulatorConfig::default().with_screen_width(0);
        assert!(EpisodeRunner::new(&grid, config).is_err());
    }
}
