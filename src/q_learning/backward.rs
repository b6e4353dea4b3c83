//! Episode-level backward credit assignment
//!
//! Instead of bootstrapping after every turn, the agent records the episode's
//! trajectory and, once it ends, spreads the terminal reward backwards over the
//! recorded actions with geometric decay: the last action receives the full
//! reward, the one before it `γ` times the reward, and so on.

use rand::rngs::StdRng;

use crate::{
    Result,
    ports::{Learner, Transition},
    q_learning::q_table::QTable,
    sim::Action,
    types::Fingerprint,
};

/// One recorded entry of a [`Trajectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectoryStep {
    /// Fingerprint observed after `action` resolved
    pub state: Fingerprint,
    /// Action that led here; `None` for the episode's initial entry
    pub action: Option<Action>,
}

/// Ordered (fingerprint, action) record of one episode.
///
/// Entry `i > 0` pairs the action taken from entry `i - 1`'s fingerprint with
/// the fingerprint it produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trajectory {
    steps: Vec<TrajectoryStep>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a trajectory at `initial` with a placeholder action.
    pub fn starting_at(initial: Fingerprint) -> Self {
        let mut trajectory = Self::new();
        trajectory.record(initial, None);
        trajectory
    }

    pub fn record(&mut self, state: Fingerprint, action: Option<Action>) {
        self.steps.push(TrajectoryStep { state, action });
    }

    pub fn steps(&self) -> &[TrajectoryStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

/// Blend every recorded action toward `terminal_reward · γ^k`, where `k`
/// counts the actions recorded after it.
///
/// Trajectories with at most one entry carry no action and are left alone.
pub fn assign_backward_credit(table: &mut QTable, trajectory: &Trajectory, terminal_reward: f64) {
    let steps = trajectory.steps();
    if steps.len() <= 1 {
        return;
    }

    let gamma = table.discount_factor();
    let mut decay = 1.0;
    for i in (1..steps.len()).rev() {
        if let Some(action) = steps[i].action {
            table.blend(&steps[i - 1].state, action.index(), terminal_reward * decay);
        }
        decay *= gamma;
    }
}

/// Agent that learns once per episode by backward credit assignment.
#[derive(Debug, Clone)]
pub struct BackwardCreditAgent {
    q_table: QTable,
    epsilon: f64,
    trajectory: Trajectory,
}

impl BackwardCreditAgent {
    /// Create a new backward-credit agent
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter, per-step decay of the terminal reward
    /// * `epsilon` - Exploration rate used during training
    pub fn new(learning_rate: f64, discount_factor: f64, epsilon: f64) -> Self {
        Self {
            q_table: QTable::new(Action::COUNT, learning_rate, discount_factor),
            epsilon,
            trajectory: Trajectory::new(),
        }
    }

    /// Append a turn to the current episode's trajectory.
    pub fn record_step(&mut self, state: Fingerprint, action: Option<Action>) {
        self.trajectory.record(state, action);
    }

    /// Apply backward credit for an externally recorded trajectory.
    pub fn finish_trajectory(&mut self, trajectory: &Trajectory, terminal_reward: f64) {
        assign_backward_credit(&mut self.q_table, trajectory, terminal_reward);
    }

    /// Trajectory recorded so far in the current episode.
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }
}

impl Learner for BackwardCreditAgent {
    fn select_action(
        &mut self,
        state: &Fingerprint,
        epsilon: f64,
        rng: &mut StdRng,
    ) -> Result<Action> {
        Action::from_index(self.q_table.select_action(state, epsilon, rng))
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn begin_episode(&mut self, initial_state: &Fingerprint) -> Result<()> {
        self.trajectory = Trajectory::starting_at(initial_state.clone());
        Ok(())
    }

    fn observe(&mut self, transition: &Transition<'_>) -> Result<()> {
        self.record_step(transition.next_state.clone(), Some(transition.action));
        Ok(())
    }

    fn finish_episode(&mut self, terminal_reward: f64) -> Result<()> {
        let trajectory = std::mem::take(&mut self.trajectory);
        tracing::trace!(
            steps = trajectory.len(),
            terminal_reward,
            "assigning backward credit"
        );
        assign_backward_credit(&mut self.q_table, &trajectory, terminal_reward);
        Ok(())
    }

    fn values(&mut self, state: &Fingerprint) -> &[f64] {
        self.q_table.values(state)
    }

    fn table(&self) -> &QTable {
        &self.q_table
    }

    fn name(&self) -> &str {
        "Backward-Credit"
    }

    fn reset(&mut self) {
        self.q_table.reset();
        self.trajectory.clear();
    }
}
