#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod types;

/// Named board presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked((9, 9), 10),
            Self::Medium => GameConfig::new_unchecked((16, 16), 40),
            Self::Hard => GameConfig::new_unchecked((16, 30), 99),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates the board shape and that the mine count leaves room for at
    /// least the protected first-click cell.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidCoords);
        }
        let config = Self::new_unchecked(size, mines);
        if mines >= config.total_cells() {
            return Err(GameError::TooManyMines);
        }
        Ok(config)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Fixed mine layout for one game, plus the adjacent-mine count of every
/// safe cell, computed once right after placement and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    mines: Array2<bool>,
    counts: Array2<u8>,
    mine_count: CellCount,
}

impl Minefield {
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let mine_count = mines
            .iter()
            .filter(|&&has_mine| has_mine)
            .count()
            .try_into()
            .unwrap();

        let dim = mines.dim();
        let size: Coord2 = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());

        // One full counting pass; counts stay 0 for mine cells.
        let mut counts = Array2::from_elem(dim, 0u8);
        for row in 0..size.0 {
            for col in 0..size.1 {
                let coords = (row, col);
                if !mines[coords.to_nd_index()] {
                    counts[coords.to_nd_index()] = neighbors(coords, size)
                        .filter(|&pos| mines[pos.to_nd_index()])
                        .count()
                        .try_into()
                        .unwrap();
                }
            }
        }

        Self {
            mines,
            counts,
            mine_count,
        }
    }

    /// Builds a layout from explicit mine positions. Mainly for tests and
    /// embedders that bring their own placement.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mines[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mines))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mines.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len().try_into().unwrap()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Precomputed adjacent-mine count; meaningful only for safe cells.
    pub fn adjacent_count(&self, coords: Coord2) -> u8 {
        self.counts[coords.to_nd_index()]
    }
}

impl Index<Coord2> for Minefield {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mines[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_mine_count_that_fills_the_board() {
        assert_eq!(GameConfig::new((3, 3), 9), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new((3, 3), 10), Err(GameError::TooManyMines));
        assert!(GameConfig::new((3, 3), 8).is_ok());
    }

    #[test]
    fn config_rejects_degenerate_board() {
        assert_eq!(GameConfig::new((0, 5), 0), Err(GameError::InvalidCoords));
    }

    #[test]
    fn config_allows_zero_mines() {
        let config = GameConfig::new((5, 5), 0).unwrap();
        assert_eq!(config.total_cells(), 25);
    }

    #[test]
    fn presets_match_expected_dimensions() {
        assert_eq!(Difficulty::Easy.config(), GameConfig::new_unchecked((9, 9), 10));
        assert_eq!(Difficulty::Medium.config(), GameConfig::new_unchecked((16, 16), 40));
        assert_eq!(Difficulty::Hard.config(), GameConfig::new_unchecked((16, 30), 99));
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        assert_eq!(
            Minefield::from_mine_coords((2, 2), &[(2, 0)]).unwrap_err(),
            GameError::InvalidCoords
        );
    }

    #[test]
    fn counts_are_exact_under_edge_clipping() {
        // Mines in opposite corners of a 3x3 board.
        let field = Minefield::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(field.mine_count(), 2);
        assert_eq!(field.safe_cell_count(), 7);
        assert_eq!(field.adjacent_count((1, 1)), 2);
        assert_eq!(field.adjacent_count((0, 1)), 1);
        assert_eq!(field.adjacent_count((1, 0)), 1);
        assert_eq!(field.adjacent_count((0, 2)), 0);
        assert_eq!(field.adjacent_count((2, 0)), 0);
        assert_eq!(field.adjacent_count((1, 2)), 1);
        assert_eq!(field.adjacent_count((2, 1)), 1);
    }

    #[test]
    fn counts_stay_zero_on_mine_cells() {
        let field = Minefield::from_mine_coords((2, 2), &[(0, 0), (0, 1)]).unwrap();
        assert_eq!(field.adjacent_count((0, 0)), 0);
        assert!(field.contains_mine((0, 0)));
    }

    #[test]
    fn full_neighborhood_counts_to_eight() {
        let mines: alloc::vec::Vec<Coord2> = (0..3)
            .flat_map(|row| (0..3).map(move |col| (row, col)))
            .filter(|&coords| coords != (1, 1))
            .collect();
        let field = Minefield::from_mine_coords((3, 3), &mines).unwrap();
        assert_eq!(field.adjacent_count((1, 1)), 8);
    }
}
