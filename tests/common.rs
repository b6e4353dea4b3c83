//! Common test utilities for the aqtion test suite.
//!
//! Level fixtures shared by the integration tests plus a tiny helper for
//! driving trained learners greedily.

#![allow(dead_code)]

use aqtion::{
    Grid, GridOptions,
    app::{AgentConfig, LearningRule, create_learner},
    ports::Learner,
};

/// Parse level text with default options.
pub fn grid(text: &str) -> Grid {
    Grid::parse(text, &GridOptions::new()).expect("fixture level should parse")
}

/// Flat five-column corridor on a solid floor; walking right reaches the goal.
pub fn corridor() -> Grid {
    grid("     \n#####")
}

/// Floor with a one-tile gap at column 2; the agent lands at (1, 3) and must
/// jump to clear it.
pub fn gap_level() -> Grid {
    grid("      \n      \n      \n      \n## ###")
}

/// Mixed terrain with steps, a ceiling and a pit.
pub fn rough_level() -> Grid {
    grid("         \n   #     \n  ##  #  \n### ##v##")
}

/// Build a boxed learner for `rule` with the given rates.
pub fn learner(rule: LearningRule, alpha: f64, gamma: f64, epsilon: f64) -> Box<dyn Learner> {
    create_learner(
        &AgentConfig::new(rule)
            .with_learning_rate(alpha)
            .with_discount_factor(gamma)
            .with_epsilon(epsilon),
    )
    .expect("valid agent config")
}
