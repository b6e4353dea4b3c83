//! Tabular value learning over observation fingerprints
//!
//! Both learning rules share one [`QTable`] representation and the same
//! ε-greedy action selection; they differ only in how credit is assigned.
//!
//! ## Algorithms
//!
//! - **One-step Q-learning**: bootstraps from the successor state after every turn
//! - **Backward credit assignment**: waits for the episode to end, then spreads the
//!   terminal reward over the trajectory with geometric decay
//!
//! ## Key Differences
//!
//! | Aspect | Q-learning | Backward credit |
//! |--------|------------|-----------------|
//! | Update time | Every turn | Episode end |
//! | Target | r + γ·max Q(s',·) | R_terminal·γ^k |
//! | Uses per-turn reward | Yes | No |
//!
//! ## Usage Example
//!
//! ```no_run
//! use aqtion::q_learning::{BackwardCreditAgent, QLearningAgent};
//!
//! let one_step = QLearningAgent::new(
//!     0.1, // learning_rate
//!     0.3, // discount_factor
//!     0.1, // epsilon (exploration)
//! );
//!
//! let backward = BackwardCreditAgent::new(0.1, 0.9, 0.1);
//! ```

pub mod agent;
pub mod backward;
pub mod q_table;

// Public re-exports
pub use agent::QLearningAgent;
pub use backward::{BackwardCreditAgent, Trajectory, TrajectoryStep, assign_backward_credit};
pub use q_table::QTable;
