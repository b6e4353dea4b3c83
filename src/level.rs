//! Tile-based level representation

pub mod grid;
pub mod tile;

pub use grid::{Grid, GridOptions};
pub use tile::Tile;
