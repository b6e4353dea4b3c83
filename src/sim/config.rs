//! Simulator configuration: observation window, reward shaping and physics

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    level::Grid,
    types::{Fingerprint, Position},
};

/// Local tile window used to build value-table keys.
///
/// Rows span `y - height/2 ..= y + height/2` and columns span `x ..= x + width`,
/// so the window always looks ahead of the agent, never behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationWindow {
    pub height: usize,
    pub width: usize,
}

impl ObservationWindow {
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Coarser 3x3 window: fewer distinct keys, faster to learn.
    pub const fn narrow() -> Self {
        Self::new(3, 3)
    }

    /// Number of tiles encoded in every fingerprint.
    pub fn cell_count(&self) -> usize {
        (2 * (self.height / 2) + 1) * (self.width + 1)
    }

    /// Read the window around `pos`. Cells outside the grid read as walls.
    pub fn fingerprint(&self, grid: &Grid, pos: Position) -> Fingerprint {
        let half = (self.height / 2) as i32;
        let ahead = self.width as i32;
        (pos.y - half..=pos.y + half)
            .flat_map(|y| (pos.x..=pos.x + ahead).map(move |x| (x, y)))
            .map(|(x, y)| grid.get_or_wall(x, y).to_char())
            .collect()
    }
}

impl Default for ObservationWindow {
    fn default() -> Self {
        Self::new(3, 5)
    }
}

/// How the per-turn score is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    /// Score tracks horizontal progress: `x` while running, `100 + x` at the goal.
    #[default]
    Progress,
    /// Fixed terminal reward: `0` while running, `100` at the goal.
    Terminal,
}

impl RewardMode {
    pub const GOAL_REWARD: i32 = 100;
    pub const DEATH_REWARD: i32 = -100;

    pub(crate) fn goal_score(self, x: i32) -> i32 {
        match self {
            RewardMode::Progress => Self::GOAL_REWARD + x,
            RewardMode::Terminal => Self::GOAL_REWARD,
        }
    }

    pub(crate) fn running_score(self, x: i32) -> i32 {
        match self {
            RewardMode::Progress => x,
            RewardMode::Terminal => 0,
        }
    }
}

/// Configuration for a [`super::Simulator`].
///
/// # Examples
///
/// ```
/// use aqtion::sim::{ObservationWindow, RewardMode, SimulatorConfig};
///
/// let config = SimulatorConfig::default()
///     .with_window(ObservationWindow::narrow())
///     .with_reward_mode(RewardMode::Terminal)
///     .with_max_turns(500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Window used for value-table keys
    pub window: ObservationWindow,
    /// Reward shaping policy
    pub reward_mode: RewardMode,
    /// Columns shown by the screen view; not used for learning
    pub screen_width: usize,
    /// Maximum number of rows a single jump tries to rise
    pub jump_height: u32,
    /// Turn ceiling after which a running episode is cut off
    pub max_turns: Option<u32>,
}

impl SimulatorConfig {
    pub const DEFAULT_SCREEN_WIDTH: usize = 20;
    pub const DEFAULT_JUMP_HEIGHT: u32 = 3;
    pub const DEFAULT_MAX_TURNS: u32 = 10_000;

    pub fn with_window(mut self, window: ObservationWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_reward_mode(mut self, mode: RewardMode) -> Self {
        self.reward_mode = mode;
        self
    }

    pub fn with_screen_width(mut self, width: usize) -> Self {
        self.screen_width = width;
        self
    }

    pub fn with_jump_height(mut self, height: u32) -> Self {
        self.jump_height = height;
        self
    }

    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = Some(turns);
        self
    }

    /// Let episodes run until a terminal tile is reached.
    pub fn without_turn_limit(mut self) -> Self {
        self.max_turns = None;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.height == 0 || self.window.width == 0 {
            return Err(Error::config(format!(
                "observation window must be non-empty, got {}x{}",
                self.window.height, self.window.width
            )));
        }
        if self.screen_width == 0 {
            return Err(Error::config("screen width must be positive"));
        }
        if self.max_turns == Some(0) {
            return Err(Error::config("turn ceiling must be positive"));
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            window: ObservationWindow::default(),
            reward_mode: RewardMode::default(),
            screen_width: Self::DEFAULT_SCREEN_WIDTH,
            jump_height: Self::DEFAULT_JUMP_HEIGHT,
            max_turns: Some(Self::DEFAULT_MAX_TURNS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::GridOptions;

    #[test]
    fn test_window_cell_count() {
        assert_eq!(ObservationWindow::default().cell_count(), 18);
        assert_eq!(ObservationWindow::narrow().cell_count(), 12);
    }

    #[test]
    fn test_fingerprint_reads_walls_outside_grid() {
        let grid = Grid::parse("  \n##", &GridOptions::new()).unwrap();
        let window = ObservationWindow::new(3, 2);
        let key = window.fingerprint(&grid, Position::new(0, 0));
        // Row -1 is above the level, row 0 ends with the goal column, row 1 is floor.
        assert_eq!(key.as_str(), "###  |##|");
        assert_eq!(key.len(), window.cell_count());
    }

    #[test]
    fn test_fingerprint_length_is_constant_at_edges() {
        let grid = Grid::parse("   \n   \n###", &GridOptions::new()).unwrap();
        let window = ObservationWindow::default();
        for y in 0..grid.height() as i32 {
            for x in 0..grid.padded_width() as i32 {
                let key = window.fingerprint(&grid, Position::new(x, y));
                assert_eq!(key.len(), window.cell_count());
            }
        }
    }

    #[test]
    fn test_reward_modes() {
        assert_eq!(RewardMode::Progress.goal_score(7), 107);
        assert_eq!(RewardMode::Terminal.goal_score(7), 100);
        assert_eq!(RewardMode::Progress.running_score(4), 4);
        assert_eq!(RewardMode::Terminal.running_score(4), 0);
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let config = SimulatorConfig::default().with_window(ObservationWindow::new(0, 5));
        assert!(config.validate().is_err());
        assert!(SimulatorConfig::default().with_max_turns(0).validate().is_err());
        assert!(SimulatorConfig::default().with_screen_width(0).validate().is_err());
        assert!(SimulatorConfig::default().validate().is_ok());
    }
}
