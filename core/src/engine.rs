use alloc::collections::{BTreeSet, VecDeque};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Session-level status.
///
/// Valid transitions:
/// - NotStarted -> InProgress on the first reveal (which also places mines)
/// - NotStarted | InProgress -> Won | Lost
///
/// Won and Lost are terminal; a new game is a new [`Game`] value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from construction to a terminal state.
///
/// The minefield does not exist until the first reveal: placement is
/// deferred so the first revealed cell can be excluded from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    seed: u64,
    minefield: Option<Minefield>,
    grid: Array2<Cell>,
    flag_count: CellCount,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Game {
    /// Fresh board for a named preset. `seed` drives mine placement.
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_config(difficulty.config(), seed)
    }

    pub fn with_config(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            minefield: None,
            grid: Array2::default(config.size.to_nd_index()),
            flag_count: 0,
            state: GameState::NotStarted,
            triggered_mine: None,
        }
    }

    /// Starts from an explicit layout, bypassing deferred placement. The
    /// first reveal gets no safety guarantee here.
    pub fn with_minefield(minefield: Minefield) -> Self {
        let config = minefield.game_config();
        Self {
            config,
            seed: 0,
            minefield: Some(minefield),
            grid: Array2::default(config.size.to_nd_index()),
            flag_count: 0,
            state: GameState::NotStarted,
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn ended(&self) -> bool {
        self.state.is_final()
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    /// Display counter only: mines minus flags, never validated against the
    /// actual layout, and negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        self.config.mines as isize - self.flag_count as isize
    }

    /// None until the first reveal has placed the mines.
    pub fn minefield(&self) -> Option<&Minefield> {
        self.minefield.as_ref()
    }

    /// The mine that ended the game, if it ended in a loss.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid[coords.to_nd_index()]
    }

    /// Render projection of one cell.
    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.validate_coords(coords)?;
        let cell = self.grid[coords.to_nd_index()];
        let has_mine = self
            .minefield
            .as_ref()
            .is_some_and(|field| field.contains_mine(coords));

        Ok(CellView {
            revealed: cell.is_revealed(),
            flagged: cell.is_flagged(),
            mine_hit: cell.is_revealed() && has_mine,
            neighbor_count: match cell {
                Cell::Revealed(count) => count,
                Cell::Hidden | Cell::Flagged => 0,
            },
        })
    }

    /// Flips the flag on a hidden cell; no-op on a revealed one. Allowed
    /// before the first reveal, rejected once the game has ended.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        use Cell::*;
        use FlagOutcome::*;

        let coords = self.validate_coords(coords)?;
        self.check_not_final()?;

        Ok(match self.grid[coords.to_nd_index()] {
            Hidden => {
                self.grid[coords.to_nd_index()] = Flagged;
                self.flag_count += 1;
                Changed
            }
            Flagged => {
                self.grid[coords.to_nd_index()] = Hidden;
                self.flag_count -= 1;
                Changed
            }
            Revealed(_) => NoChange,
        })
    }

    /// Reveals a hidden cell; no-op on flagged or already-revealed cells.
    ///
    /// The first reveal of the game also places the mines, excluding the
    /// revealed coordinate, and computes every adjacent-mine count.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_final()?;

        if !matches!(self.grid[coords.to_nd_index()], Cell::Hidden) {
            // Flagged reveals are no-ops and must not trigger placement.
            return Ok(RevealOutcome::NoChange);
        }

        if self.minefield.is_none() {
            let field = RandomMinefieldGenerator::new(self.seed, coords).generate(self.config);
            self.minefield = Some(field);
        }

        Ok(self.reveal_cell(coords))
    }

    /// Reveals the hidden cell at `coords` and, if it is empty, flood-fills
    /// its connected empty region plus that region's non-empty border.
    /// Flagged cells block the cascade and are never auto-revealed.
    fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        use Cell::*;

        let Some(minefield) = &self.minefield else {
            return RevealOutcome::NoChange;
        };

        if minefield.contains_mine(coords) {
            self.grid[coords.to_nd_index()] = Revealed(0);
            self.triggered_mine = Some(coords);
            self.state = GameState::Lost;
            log::debug!("mine hit at {:?}", coords);
            return RevealOutcome::HitMine;
        }

        let count = minefield.adjacent_count(coords);
        self.grid[coords.to_nd_index()] = Revealed(count);
        log::trace!("revealed {:?}, adjacent mines: {}", coords, count);

        if count == 0 {
            let size = self.config.size;
            let mut visited = BTreeSet::from([coords]);
            let mut frontier = VecDeque::from([coords]);

            // Each coordinate enters the frontier at most once, so this
            // terminates on any finite grid.
            while let Some(from) = frontier.pop_front() {
                for pos in neighbors(from, size) {
                    if !visited.insert(pos) {
                        continue;
                    }
                    if !matches!(self.grid[pos.to_nd_index()], Hidden) {
                        continue;
                    }

                    let pos_count = minefield.adjacent_count(pos);
                    self.grid[pos.to_nd_index()] = Revealed(pos_count);
                    log::trace!("cascade revealed {:?}, adjacent mines: {}", pos, pos_count);

                    // Border cells (count > 0) open but do not propagate.
                    if pos_count == 0 {
                        frontier.push_back(pos);
                    }
                }
            }
        }

        if self.check_win() {
            self.state = GameState::Won;
            log::debug!("all safe cells revealed");
            RevealOutcome::Won
        } else {
            if self.state.is_initial() {
                self.state = GameState::InProgress;
            }
            RevealOutcome::Revealed
        }
    }

    /// True iff every non-mine cell is revealed. Full-board scan; false
    /// before the mines have been placed.
    pub fn check_win(&self) -> bool {
        let Some(minefield) = &self.minefield else {
            return false;
        };

        let (rows, cols) = self.config.size;
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if !minefield.contains_mine(coords)
                    && !self.grid[coords.to_nd_index()].is_revealed()
                {
                    return false;
                }
            }
        }
        true
    }

    /// Marks every cell revealed, mines and flagged cells included, so a
    /// frontend can show the full board after a loss. No-op while the game
    /// is still running.
    pub fn reveal_all(&mut self) {
        if !self.state.is_final() {
            return;
        }
        let Some(minefield) = &self.minefield else {
            return;
        };

        let (rows, cols) = self.config.size;
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                self.grid[coords.to_nd_index()] = Cell::Revealed(minefield.adjacent_count(coords));
            }
        }
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.config.size;
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn check_not_final(&self) -> Result<()> {
        if self.state.is_final() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
