//! Application layer: turns configuration into ready-to-train learners.
//!
//! The training pipeline only knows the [`crate::ports::Learner`] port; this
//! module picks the concrete learning rule behind it.
//!
//! # Usage
//!
//! ```
//! use aqtion::app::{AgentConfig, LearningRule, create_learner};
//!
//! let config = AgentConfig::new(LearningRule::OneStep).with_epsilon(0.2);
//! let learner = create_learner(&config)?;
//! assert_eq!(learner.name(), "Q-Learning");
//! assert_eq!(learner.epsilon(), 0.2);
//! # Ok::<(), aqtion::Error>(())
//! ```

pub mod config;

pub use config::{AgentConfig, LearningRule};

use crate::{
    Result,
    ports::Learner,
    q_learning::{BackwardCreditAgent, QLearningAgent},
};

/// Validate `config` and build the learner it describes.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidConfiguration`] if any rate is outside `[0, 1]`.
pub fn create_learner(config: &AgentConfig) -> Result<Box<dyn Learner>> {
    config.validate()?;
    let learner: Box<dyn Learner> = match config.rule {
        LearningRule::OneStep => Box::new(QLearningAgent::new(
            config.learning_rate,
            config.discount_factor,
            config.epsilon,
        )),
        LearningRule::EpisodeBackward => Box::new(BackwardCreditAgent::new(
            config.learning_rate,
            config.discount_factor,
            config.epsilon,
        )),
    };
    tracing::debug!(
        learner = learner.name(),
        alpha = config.learning_rate,
        gamma = config.discount_factor,
        epsilon = config.epsilon,
        "created learner"
    );
    Ok(learner)
}
