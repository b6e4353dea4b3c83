//! Learner port - abstraction over value-table learning rules
//!
//! This port defines the interface every learning rule implements so the
//! episode runner can drive any of them the same way:
//! - One-step bootstrapped Q-learning (updates after every turn)
//! - Episode-level backward credit assignment (updates once per episode)

use rand::rngs::StdRng;

use crate::{Result, q_learning::QTable, sim::Action, types::Fingerprint};

/// One completed turn as seen by a learner.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    /// Fingerprint the action was chosen from
    pub state: &'a Fingerprint,
    /// Action taken
    pub action: Action,
    /// Fingerprint after the turn resolved
    pub next_state: &'a Fingerprint,
    /// Reward reported for the turn
    pub reward: f64,
}

/// Learner trait - Unified interface for all learning rules
///
/// Both rules share the same action-selection and value-lookup contract and
/// differ only in when their updates happen.
///
/// # Event Sequence
///
/// For every training episode the runner calls:
/// 1. `begin_episode(initial_state)`
/// 2. For each turn: `select_action(...)`, then `observe(transition)`
/// 3. `finish_episode(terminal_reward)`
///
/// Evaluation episodes only call `select_action`.
///
/// # Examples
///
/// ```no_run
/// use aqtion::{ports::Learner, types::Fingerprint};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// fn best_guess(learner: &mut dyn Learner, state: &Fingerprint) -> aqtion::Result<()> {
///     let mut rng = StdRng::seed_from_u64(0);
///     let action = learner.select_action(state, 0.0, &mut rng)?;
///     println!("{action}: {:?}", learner.values(state));
///     Ok(())
/// }
/// ```
pub trait Learner: Send {
    /// Choose an action for `state` ε-greedily.
    ///
    /// `epsilon` is passed per call so training and evaluation can explore
    /// at different rates; ties for the best value are broken with `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] if the table yields a slot with
    /// no corresponding action.
    fn select_action(
        &mut self,
        state: &Fingerprint,
        epsilon: f64,
        rng: &mut StdRng,
    ) -> Result<Action>;

    /// Exploration rate this learner was configured to train with.
    fn epsilon(&self) -> f64;

    /// Called once before the first turn of a training episode.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for rules that learn turn by turn.
    fn begin_episode(&mut self, _initial_state: &Fingerprint) -> Result<()> {
        Ok(())
    }

    /// Called after every turn of a training episode.
    fn observe(&mut self, transition: &Transition<'_>) -> Result<()>;

    /// Called once after the last turn of a training episode.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for rules that learn turn by turn.
    fn finish_episode(&mut self, _terminal_reward: f64) -> Result<()> {
        Ok(())
    }

    /// Value vector for `state`, materialised as zeros if unseen.
    fn values(&mut self, state: &Fingerprint) -> &[f64];

    /// Read-only view of the underlying value table.
    fn table(&self) -> &QTable;

    /// Get the learner's name.
    ///
    /// Used for identification in reports and logging.
    fn name(&self) -> &str;

    /// Forget everything learned so far.
    fn reset(&mut self);
}
