//! Q-table implementation for tabular value learning

use std::{collections::HashMap, fmt};

use rand::{Rng, seq::IndexedRandom};

use crate::types::Fingerprint;

/// Q-table mapping observation fingerprints to one value per action.
///
/// Value vectors are materialised lazily: the first reference to an unseen
/// fingerprint inserts an all-zero vector of `action_count` slots. Lookups
/// that must not insert go through [`QTable::peek`].
#[derive(Debug, Clone)]
pub struct QTable {
    /// Q-values: fingerprint -> value per action slot
    values: HashMap<Fingerprint, Vec<f64>>,
    /// Number of action slots per entry
    action_count: usize,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(action_count: usize, learning_rate: f64, discount_factor: f64) -> Self {
        debug_assert!(action_count > 0, "Q-table needs at least one action");
        Self {
            values: HashMap::new(),
            action_count,
            learning_rate,
            discount_factor,
        }
    }

    fn entry(&mut self, state: &Fingerprint) -> &mut Vec<f64> {
        let action_count = self.action_count;
        self.values
            .entry(state.clone())
            .or_insert_with(|| vec![0.0; action_count])
    }

    /// Value vector for a state, inserting zeros for unseen states
    pub fn values(&mut self, state: &Fingerprint) -> &[f64] {
        self.entry(state)
    }

    /// Value vector for a state without inserting anything
    pub fn peek(&self, state: &Fingerprint) -> Option<&[f64]> {
        self.values.get(state).map(Vec::as_slice)
    }

    /// Get Q-value for a state-action pair
    pub fn get(&mut self, state: &Fingerprint, action: usize) -> f64 {
        self.entry(state)[action]
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: &Fingerprint, action: usize, value: f64) {
        self.entry(state)[action] = value;
    }

    /// Get maximum Q-value in a state
    pub fn max_q(&mut self, state: &Fingerprint) -> f64 {
        self.entry(state)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// All actions attaining the maximum Q-value in a state
    pub fn greedy_actions(&mut self, state: &Fingerprint) -> Vec<usize> {
        let best = self.max_q(state);
        self.entry(state)
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == best)
            .map(|(action, _)| action)
            .collect()
    }

    /// ε-greedy action selection
    ///
    /// Explores a uniformly random action with probability `epsilon`; otherwise
    /// picks uniformly among the actions tied for the highest value.
    pub fn select_action<R: Rng + ?Sized>(
        &mut self,
        state: &Fingerprint,
        epsilon: f64,
        rng: &mut R,
    ) -> usize {
        if rng.random::<f64>() < epsilon {
            // Explore: random action
            return rng.random_range(0..self.action_count);
        }
        // Exploit: greedy action, ties broken at random
        self.greedy_actions(state)
            .choose(rng)
            .copied()
            .unwrap_or_default()
    }

    /// Move Q(s,a) towards `target` at the learning rate
    ///
    /// Q(s,a) ← (1 − α)·Q(s,a) + α·target
    pub fn blend(&mut self, state: &Fingerprint, action: usize, target: f64) {
        let alpha = self.learning_rate;
        let slot = &mut self.entry(state)[action];
        *slot = (1.0 - alpha) * *slot + alpha * target;
    }

    /// Q-learning update: off-policy one-step TD control
    ///
    /// Q(s,a) ← (1 − α)·Q(s,a) + α·[r + γ·max_a' Q(s',a')]
    ///
    /// The successor is never treated as terminal: its values are read as
    /// stored, which is zero for states no action has been taken from.
    pub fn q_learning_update(
        &mut self,
        state: &Fingerprint,
        action: usize,
        next_state: &Fingerprint,
        reward: f64,
    ) {
        let max_next_q = self.max_q(next_state);
        let td_target = reward + self.discount_factor * max_next_q;
        self.blend(state, action, td_target);
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Number of materialised states
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in fingerprint order
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &[f64])> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(state, values)| (state, values.as_slice()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    /// Forget every learned value
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

impl fmt::Display for QTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, values) in self.iter() {
            write!(f, "{state}")?;
            for value in values {
                write!(f, "|{value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
