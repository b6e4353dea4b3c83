//! Padded, immutable level grid
//!
//! Every loaded row is right-padded with space up to the widest row and then
//! closed with a goal column, and a full row of death tiles (also closed with a
//! goal) is appended below the last loaded row. Walking one column past the
//! nominal width therefore always reaches the goal, and falling off the bottom
//! of any column is always fatal.

use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use super::tile::Tile;
use crate::{Error, Result};

/// Options applied while building a [`Grid`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOptions {
    /// Fixed number of loaded rows. Taller levels are rejected, shorter ones
    /// get blank rows prepended as ceiling space.
    pub height: Option<usize>,
}

impl GridOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable strict-height mode.
    pub fn with_height(mut self, height: usize) -> Self {
        self.height = Some(height);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
    width: usize,
}

impl Grid {
    /// Build a grid from already-decoded terrain rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyLevel`] if `rows` has no cells, [`Error::LevelTooTall`]
    /// if strict height is configured and exceeded, and [`Error::InvalidTile`]
    /// if a row contains the player marker.
    pub fn from_rows(rows: Vec<Vec<Tile>>, options: &GridOptions) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyLevel);
        }
        for (row_idx, row) in rows.iter().enumerate() {
            if let Some(column) = row.iter().position(|&tile| tile == Tile::Player) {
                return Err(Error::InvalidTile {
                    character: Tile::Player.to_char(),
                    row: row_idx,
                    column,
                });
            }
        }

        let mut rows = rows;
        if let Some(max) = options.height {
            if rows.len() > max {
                return Err(Error::LevelTooTall {
                    rows: rows.len(),
                    max,
                });
            }
            let missing = max - rows.len();
            if missing > 0 {
                tracing::debug!(missing, "prepending blank rows to reach level height");
                rows.splice(0..0, std::iter::repeat_n(Vec::new(), missing));
            }
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(Error::EmptyLevel);
        }
        let mut padded: Vec<Vec<Tile>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Tile::Space);
                row.push(Tile::Goal);
                row
            })
            .collect();

        let mut death_row = vec![Tile::Death; width];
        death_row.push(Tile::Goal);
        padded.push(death_row);

        Ok(Self {
            rows: padded,
            width,
        })
    }

    /// Parse level text: one row per line using ` `, `#`, `v` and `|`.
    ///
    /// # Examples
    ///
    /// ```
    /// use aqtion::level::{Grid, GridOptions, Tile};
    ///
    /// let grid = Grid::parse("   \n###", &GridOptions::new()).unwrap();
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(grid.height(), 3);
    /// assert_eq!(grid.get(3, 0).unwrap(), Tile::Goal);
    /// assert_eq!(grid.get(1, 2).unwrap(), Tile::Death);
    /// ```
    pub fn parse(text: &str, options: &GridOptions) -> Result<Self> {
        let rows = text
            .lines()
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(column, character)| {
                        Tile::from_char(character).ok_or(Error::InvalidTile {
                            character,
                            row,
                            column,
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(rows, options)
    }

    /// Read and parse a level file.
    pub fn load<P: AsRef<Path>>(path: P, options: &GridOptions) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read level file {}", path.display()),
            source,
        })?;
        Self::parse(&text, options)
    }

    /// Strict accessor for positions the caller knows to be inside the grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] for any cell outside the padded extent.
    pub fn get(&self, x: i32, y: i32) -> Result<Tile> {
        self.cell(x, y).ok_or(Error::OutOfBounds { x, y })
    }

    /// Bounds-safe accessor: cells outside the padded extent read as `default`.
    pub fn get_or(&self, x: i32, y: i32, default: Tile) -> Tile {
        self.cell(x, y).unwrap_or(default)
    }

    /// [`Grid::get_or`] with the conventional wall default.
    pub fn get_or_wall(&self, x: i32, y: i32) -> Tile {
        self.get_or(x, y, Tile::Wall)
    }

    fn cell(&self, x: i32, y: i32) -> Option<Tile> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// Widest loaded row; the goal column sits at `x == width()`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Row length including the goal column.
    pub fn padded_width(&self) -> usize {
        self.width + 1
    }

    /// Number of rows including the death row.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line: String = row.iter().map(|tile| tile.to_char()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_padded_and_closed_with_goal() {
        let grid = Grid::parse(" #\n#\n", &GridOptions::new()).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.padded_width(), 3);
        assert_eq!(grid.get(1, 1).unwrap(), Tile::Space);
        assert_eq!(grid.get(2, 0).unwrap(), Tile::Goal);
        assert_eq!(grid.get(2, 1).unwrap(), Tile::Goal);
    }

    #[test]
    fn test_death_row_is_appended() {
        let grid = Grid::parse("  \n##", &GridOptions::new()).unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(0, 2).unwrap(), Tile::Death);
        assert_eq!(grid.get(1, 2).unwrap(), Tile::Death);
        assert_eq!(grid.get(2, 2).unwrap(), Tile::Goal);
    }

    #[test]
    fn test_strict_access_rejects_outside_cells() {
        let grid = Grid::parse("##", &GridOptions::new()).unwrap();
        assert!(matches!(
            grid.get(-1, 0),
            Err(Error::OutOfBounds { x: -1, y: 0 })
        ));
        assert!(grid.get(3, 0).is_err());
        assert!(grid.get(0, 2).is_err());
    }

    #[test]
    fn test_safe_access_returns_default() {
        let grid = Grid::parse("  ", &GridOptions::new()).unwrap();
        assert_eq!(grid.get_or_wall(0, -1), Tile::Wall);
        assert_eq!(grid.get_or_wall(-1, 0), Tile::Wall);
        assert_eq!(grid.get_or_wall(9, 0), Tile::Wall);
        assert_eq!(grid.get_or(0, 5, Tile::Death), Tile::Death);
        assert_eq!(grid.get_or_wall(0, 0), Tile::Space);
    }

    #[test]
    fn test_strict_height_prepends_blank_rows() {
        let grid = Grid::parse("##", &GridOptions::new().with_height(3)).unwrap();
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.get(0, 0).unwrap(), Tile::Space);
        assert_eq!(grid.get(2, 1).unwrap(), Tile::Goal);
        assert_eq!(grid.get(0, 2).unwrap(), Tile::Wall);
        assert_eq!(grid.get(0, 3).unwrap(), Tile::Death);
    }

    #[test]
    fn test_strict_height_rejects_tall_levels() {
        let err = Grid::parse(" \n \n#", &GridOptions::new().with_height(2)).unwrap_err();
        assert!(matches!(err, Error::LevelTooTall { rows: 3, max: 2 }));
    }

    #[test]
    fn test_invalid_character_is_reported_with_location() {
        let err = Grid::parse("  \n #x", &GridOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTile {
                character: 'x',
                row: 1,
                column: 2
            }
        ));
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(matches!(
            Grid::parse("", &GridOptions::new()),
            Err(Error::EmptyLevel)
        ));
        assert!(matches!(
            Grid::parse("\n\n", &GridOptions::new()),
            Err(Error::EmptyLevel)
        ));
    }

    #[test]
    fn test_display_shows_padded_map() {
        let grid = Grid::parse(" #\n##", &GridOptions::new()).unwrap();
        assert_eq!(grid.to_string(), " #|\n##|\nvv|\n");
    }
}
