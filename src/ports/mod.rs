//! Ports (trait boundaries) between the episode loop and its collaborators.
//!
//! The pipeline drives any [`Learner`] and reports to any number of
//! [`Observer`]s without knowing which learning rule or output format sits
//! behind them.

pub mod learner;
pub mod observer;

pub use learner::{Learner, Transition};
pub use observer::Observer;
