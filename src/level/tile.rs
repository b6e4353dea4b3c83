//! Terrain symbols of a level cell

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on the level grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Space,
    Wall,
    Goal,
    Death,
    /// Render-time overlay for the agent; never stored in a [`super::Grid`].
    Player,
}

impl Tile {
    pub fn to_char(self) -> char {
        match self {
            Tile::Space => ' ',
            Tile::Wall => '#',
            Tile::Goal => '|',
            Tile::Death => 'v',
            Tile::Player => '&',
        }
    }

    /// Parse a level-file character. The player marker is not a terrain tile.
    pub fn from_char(c: char) -> Option<Tile> {
        match c {
            ' ' => Some(Tile::Space),
            '#' => Some(Tile::Wall),
            '|' => Some(Tile::Goal),
            'v' => Some(Tile::Death),
            _ => None,
        }
    }

    /// Walls support standing and block horizontal movement.
    pub fn is_solid(self) -> bool {
        self == Tile::Wall
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
