//! Episode state machine: movement, gravity, jumping and termination

use serde::{Deserialize, Serialize};

use super::{action::Action, config::SimulatorConfig};
use crate::{
    Result,
    level::{Grid, Tile},
    sim::config::RewardMode,
    types::{Fingerprint, Position},
};

/// Where an episode stands after the most recent turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeStatus {
    Running,
    /// Agent entered a goal tile.
    Goal,
    /// Agent entered a death tile.
    Death,
    /// Turn ceiling reached without touching a terminal tile.
    TimedOut,
}

impl EpisodeStatus {
    pub fn is_ended(self) -> bool {
        self != EpisodeStatus::Running
    }

    pub fn is_goal(self) -> bool {
        self == EpisodeStatus::Goal
    }
}

/// Result of a single [`Simulator::step`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub reward: f64,
    pub status: EpisodeStatus,
    pub position: Position,
}

/// One agent walking through one level.
///
/// The agent starts in the top-left cell and is pulled down one row per turn
/// until it stands on a wall. Each [`Simulator::step`] is one discrete tick.
///
/// # Examples
///
/// ```
/// use aqtion::level::{Grid, GridOptions};
/// use aqtion::sim::{Action, Simulator, SimulatorConfig};
///
/// let grid = Grid::parse("  \n##", &GridOptions::new()).unwrap();
/// let mut sim = Simulator::new(&grid, SimulatorConfig::default());
/// sim.step(Action::Move).unwrap();
/// let outcome = sim.step(Action::Move).unwrap();
/// assert!(outcome.status.is_goal());
/// assert_eq!(sim.reward(), 102.0);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator<'a> {
    grid: &'a Grid,
    config: SimulatorConfig,
    position: Position,
    turn: u32,
    score: i32,
    status: EpisodeStatus,
}

impl<'a> Simulator<'a> {
    pub fn new(grid: &'a Grid, config: SimulatorConfig) -> Self {
        Self::starting_at(grid, config, Position::default())
    }

    /// Start the agent somewhere other than the top-left cell.
    pub fn starting_at(grid: &'a Grid, config: SimulatorConfig, position: Position) -> Self {
        Self {
            grid,
            config,
            position,
            turn: 0,
            score: 0,
            status: EpisodeStatus::Running,
        }
    }

    /// Advance one turn with the chosen action.
    ///
    /// Stepping an ended episode changes nothing and reports the final outcome.
    ///
    /// # Errors
    ///
    /// Strict grid reads only fail if the agent somehow left the padded grid,
    /// which the goal column and death row rule out for every running episode.
    pub fn step(&mut self, action: Action) -> Result<StepOutcome> {
        if self.status.is_ended() {
            return Ok(self.outcome());
        }
        self.turn += 1;

        match action {
            Action::Stay => {}
            Action::Move => {
                let ahead = self.position.right();
                if !self.tile(ahead)?.is_solid() {
                    self.position = ahead;
                }
            }
            Action::Jump => self.jump()?,
        }

        // Gravity: at most one row per tick, even right after a jump.
        if !self.tile(self.position.below())?.is_solid() {
            self.position = self.position.below();
        }

        let reward_mode = self.config.reward_mode;
        match self.tile(self.position)? {
            Tile::Goal => {
                self.score = reward_mode.goal_score(self.position.x);
                self.status = EpisodeStatus::Goal;
            }
            Tile::Death => {
                self.score = RewardMode::DEATH_REWARD;
                self.status = EpisodeStatus::Death;
            }
            _ => {
                self.score = reward_mode.running_score(self.position.x);
                if self.config.max_turns.is_some_and(|limit| self.turn >= limit) {
                    self.status = EpisodeStatus::TimedOut;
                }
            }
        }

        tracing::trace!(
            turn = self.turn,
            %action,
            position = %self.position,
            score = self.score,
            "step"
        );
        Ok(self.outcome())
    }

    // Only a grounded agent can jump. The obstruction test reads the row the
    // agent occupies before each rise, not the row above it; together with the
    // forced one-row drop afterwards this caps the ascent under low ceilings.
    fn jump(&mut self) -> Result<()> {
        if !self.tile(self.position.below())?.is_solid() {
            return Ok(());
        }
        for _ in 0..self.config.jump_height {
            if self.position.y - 1 < 0 {
                break;
            }
            if !matches!(self.tile(self.position)?, Tile::Wall | Tile::Death) {
                self.position.y -= 1;
            }
        }
        Ok(())
    }

    fn tile(&self, pos: Position) -> Result<Tile> {
        self.grid.get(pos.x, pos.y)
    }

    fn outcome(&self) -> StepOutcome {
        StepOutcome {
            reward: self.reward(),
            status: self.status,
            position: self.position,
        }
    }

    /// Value-table key for the agent's current surroundings.
    pub fn fingerprint(&self) -> Fingerprint {
        self.config.window.fingerprint(self.grid, self.position)
    }

    /// Immediate reward for the most recently completed turn.
    pub fn reward(&self) -> f64 {
        f64::from(self.score)
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    pub fn is_ended(&self) -> bool {
        self.status.is_ended()
    }

    pub fn is_goal(&self) -> bool {
        self.status.is_goal()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    /// Visible part of the level with the player marker overlaid.
    ///
    /// The viewport is `screen_width` columns wide: anchored left near the
    /// start, centred on the agent mid-level, anchored right near the goal.
    /// Columns past the grid read as walls. Near the goal the view ends on the
    /// goal column and still spans exactly `screen_width` columns.
    pub fn screen(&self) -> Vec<Vec<Tile>> {
        let screen_width = i32::try_from(self.config.screen_width).unwrap_or(i32::MAX);
        let padded_width = i32::try_from(self.grid.padded_width()).unwrap_or(i32::MAX);
        let max_left = padded_width.saturating_sub(screen_width).max(0);
        let left = (self.position.x - screen_width / 2).clamp(0, max_left);

        let height = i32::try_from(self.grid.height()).unwrap_or(i32::MAX);
        (0..height)
            .map(|y| {
                (left..left.saturating_add(screen_width))
                    .map(|x| {
                        if Position::new(x, y) == self.position {
                            Tile::Player
                        } else {
                            self.grid.get_or_wall(x, y)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// [`Simulator::screen`] as printable text, one line per row.
    pub fn render(&self) -> String {
        self.screen()
            .iter()
            .map(|row| row.iter().map(|tile| tile.to_char()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
