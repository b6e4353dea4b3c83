//! Discrete agent actions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One of the three things the agent can do per turn.
///
/// The discriminant doubles as the slot index in a value vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Stay = 0,
    Move = 1,
    Jump = 2,
}

impl Action {
    pub const COUNT: usize = 3;

    pub const ALL: [Action; Action::COUNT] = [Action::Stay, Action::Move, Action::Jump];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Map a value-vector slot back to its action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] for indices outside `0..Action::COUNT`.
    pub fn from_index(index: usize) -> Result<Action> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidAction { index })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Stay => "stay",
            Action::Move => "move",
            Action::Jump => "jump",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()).unwrap(), action);
        }
    }

    #[test]
    fn test_out_of_range_index() {
        assert!(matches!(
            Action::from_index(3),
            Err(Error::InvalidAction { index: 3 })
        ));
    }
}
