use ndarray::Array2;
use rand::prelude::*;

use crate::*;

/// Strategy for producing the mine layout of a fresh game.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Minefield;
}

/// Uniform random placement by rejection sampling: re-roll any pick that is
/// already a mine or is the protected first-click cell. Fine at the preset
/// densities (at most 99 mines over 480 cells).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    exclude: Coord2,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, exclude: Coord2) -> Self {
        Self { seed, exclude }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Minefield {
        let (rows, cols) = config.size;
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());

        // GameConfig::new guarantees this; cap anyway so an unchecked config
        // cannot make the rejection loop spin forever.
        let target = if config.mines >= config.total_cells() {
            log::warn!(
                "mine count {} cannot leave a safe first click on {}x{}, capping",
                config.mines,
                rows,
                cols
            );
            config.total_cells() - 1
        } else {
            config.mines
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed = 0;
        while placed < target {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if coords == self.exclude || mines[coords.to_nd_index()] {
                continue;
            }
            mines[coords.to_nd_index()] = true;
            placed += 1;
        }

        log::debug!(
            "placed {} mines on {}x{}, keeping {:?} clear",
            placed,
            rows,
            cols,
            self.exclude
        );
        Minefield::from_mine_mask(mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_mine_count() {
        let config = Difficulty::Hard.config();
        for seed in 0..20 {
            let field = RandomMinefieldGenerator::new(seed, (8, 15)).generate(config);
            assert_eq!(field.mine_count(), 99);
        }
    }

    #[test]
    fn excluded_cell_never_holds_a_mine() {
        // Dense board: every cell but one safe cell and the exclusion is mined.
        let config = GameConfig::new((3, 3), 7).unwrap();
        for seed in 0..100 {
            let field = RandomMinefieldGenerator::new(seed, (1, 1)).generate(config);
            assert!(!field.contains_mine((1, 1)), "seed {} mined the exclusion", seed);
            assert_eq!(field.mine_count(), 7);
        }
    }

    #[test]
    fn same_seed_reproduces_the_layout() {
        let config = Difficulty::Easy.config();
        let a = RandomMinefieldGenerator::new(7, (0, 0)).generate(config);
        let b = RandomMinefieldGenerator::new(7, (0, 0)).generate(config);
        assert_eq!(a, b);
    }

    #[test]
    fn impossible_config_is_capped_instead_of_spinning() {
        let config = GameConfig::new_unchecked((2, 2), 4);
        let field = RandomMinefieldGenerator::new(1, (0, 0)).generate(config);
        assert_eq!(field.mine_count(), 3);
        assert!(!field.contains_mine((0, 0)));
    }
}
