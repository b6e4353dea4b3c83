//! Configuration types for learner creation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which credit-assignment rule a learner uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningRule {
    /// Bootstrapped update after every turn
    #[default]
    OneStep,
    /// Terminal reward propagated backwards once the episode ends
    EpisodeBackward,
}

impl LearningRule {
    pub fn as_str(self) -> &'static str {
        match self {
            LearningRule::OneStep => "one-step",
            LearningRule::EpisodeBackward => "episode-backward",
        }
    }
}

impl fmt::Display for LearningRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-step" | "q-learning" | "td" => Ok(LearningRule::OneStep),
            "episode-backward" | "backward" | "monte-carlo" => Ok(LearningRule::EpisodeBackward),
            other => Err(Error::config(format!(
                "unknown learning rule '{other}' (expected 'one-step' or 'episode-backward')"
            ))),
        }
    }
}

/// Configuration for creating a learner.
///
/// This type provides a type-safe, builder-style API for configuring a
/// learner before it is created with [`super::create_learner`].
///
/// # Examples
///
/// ```
/// use aqtion::app::{AgentConfig, LearningRule};
///
/// let config = AgentConfig::new(LearningRule::EpisodeBackward)
///     .with_learning_rate(0.2)
///     .with_discount_factor(0.9)
///     .with_epsilon(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Credit-assignment rule
    pub rule: LearningRule,
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Exploration rate ε used while training
    pub epsilon: f64,
}

impl AgentConfig {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
    pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.3;
    pub const DEFAULT_EPSILON: f64 = 0.1;

    /// Create a new configuration for the given rule.
    ///
    /// Uses default values for other parameters:
    /// - Learning rate: 0.1
    /// - Discount factor: 0.3
    /// - Exploration rate: 0.1
    pub fn new(rule: LearningRule) -> Self {
        Self {
            rule,
            learning_rate: Self::DEFAULT_LEARNING_RATE,
            discount_factor: Self::DEFAULT_DISCOUNT_FACTOR,
            epsilon: Self::DEFAULT_EPSILON,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check that every rate lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("learning rate", self.learning_rate)?;
        check_unit_interval("discount factor", self.discount_factor)?;
        check_unit_interval("epsilon", self.epsilon)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(LearningRule::default())
    }
}

pub(crate) fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::config(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
