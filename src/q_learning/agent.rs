//! One-step Q-learning agent
//!
//! Updates its Q-table after every turn toward the bootstrapped target
//! `r + γ·max_a' Q(s',a')`.

use rand::rngs::StdRng;

use crate::{
    Result,
    ports::{Learner, Transition},
    q_learning::q_table::QTable,
    sim::Action,
    types::Fingerprint,
};

/// Q-learning agent (off-policy TD control)
///
/// Learns the optimal action values by always updating toward the maximum
/// next-state value, regardless of the action taken next.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    epsilon: f64,
}

impl QLearningAgent {
    /// Create a new Q-learning agent
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter (0.0 to 1.0)
    /// * `epsilon` - Exploration rate used during training
    pub fn new(learning_rate: f64, discount_factor: f64, epsilon: f64) -> Self {
        Self {
            q_table: QTable::new(Action::COUNT, learning_rate, discount_factor),
            epsilon,
        }
    }

    /// Apply one bootstrapped update for a completed turn.
    pub fn update(
        &mut self,
        state: &Fingerprint,
        action: Action,
        next_state: &Fingerprint,
        reward: f64,
    ) {
        self.q_table
            .q_learning_update(state, action.index(), next_state, reward);
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }
}

impl Learner for QLearningAgent {
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

    fn observe(&mut self, transition: &Transition<'_>) -> Result<()> {
        self.update(
            transition.state,
            transition.action,
            transition.next_state,
            transition.reward,
        );
        Ok(())
    }

    fn values(&mut self, state: &Fingerprint) -> &[f64] {
        self.q_table.values(state)
    }

    fn table(&self) -> &QTable {
        &self.q_table
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn reset(&mut self) {
        self.q_table.reset();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_zero_learning_rate_leaves_value_unchanged() {
        let mut agent = QLearningAgent::new(0.0, 0.9, 0.1);
        let s = Fingerprint::new("s");
        let next = Fingerprint::new("next");
        agent.q_table_mut().set(&s, 1, 3.0);
        agent.q_table_mut().set(&next, 0, 50.0);

        agent.update(&s, Action::Move, &next, 7.0);

        assert_eq!(agent.values(&s)[1], 3.0);
    }

    #[test]
    fn test_unit_learning_rate_jumps_to_target() {
        let mut agent = QLearningAgent::new(1.0, 0.5, 0.1);
        let s = Fingerprint::new("s");
        let next = Fingerprint::new("next");
        agent.q_table_mut().set(&s, 2, -8.0);
        agent.q_table_mut().set(&next, 1, 4.0);

        agent.update(&s, Action::Jump, &next, 1.0);

        // r + γ·max Q(s') = 1 + 0.5 * 4
        assert!((agent.values(&s)[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_observe_applies_update() {
        let mut agent = QLearningAgent::new(0.5, 0.0, 0.1);
        let s = Fingerprint::new("s");
        let next = Fingerprint::new("next");
        agent
            .observe(&Transition {
                state: &s,
                action: Action::Stay,
                next_state: &next,
                reward: 4.0,
            })
            .unwrap();
        assert!((agent.values(&s)[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_select_action_prefers_highest_value() {
        let mut agent = QLearningAgent::new(0.5, 0.9, 0.1);
        let mut rng = StdRng::seed_from_u64(5);
        let s = Fingerprint::new("s");
        agent.q_table_mut().set(&s, Action::Jump.index(), 1.0);
        let action = agent.select_action(&s, 0.0, &mut rng).unwrap();
        assert_eq!(action, Action::Jump);
    }
}
