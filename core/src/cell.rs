use serde::{Deserialize, Serialize};

/// Player-visible state of a single grid cell.
///
/// A cell only ever moves Hidden -> Revealed; Hidden <-> Flagged toggles
/// freely until the cell is revealed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Hidden,
    /// Revealed with the adjacent-mine count to display.
    Revealed(u8),
    Flagged,
}

impl Cell {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

/// Read-only projection of one cell, sufficient for a frontend to render it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub revealed: bool,
    pub flagged: bool,
    /// The cell is revealed and holds a mine.
    pub mine_hit: bool,
    /// Adjacent-mine count; 0 unless the cell is revealed and safe.
    pub neighbor_count: u8,
}
