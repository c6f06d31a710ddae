use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement by rejection sampling: draw a random cell, keep it unless it already holds a
/// mine, repeat until the requested count is reached.
///
/// Configurations cap the density at 40%, so the expected number of draws stays under
/// `1.3 * mines` and the loop always terminates.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, size: Coord2, mines: CellCount) -> Result<Array2<bool>> {
        let total_cells = mult(size.0, size.1);

        // a full board would never finish sampling
        if mines >= total_cells {
            log::warn!(
                "Refusing to place {} mines, board only has {} cells",
                mines,
                total_cells
            );
            return Err(GameError::TooManyMines);
        }

        let cols = usize::from(size.1);
        let mut mine_mask: Array2<bool> = Array2::default(nd_shape(size));
        let mut placed: CellCount = 0;
        let mut draws: u32 = 0;

        while placed < mines {
            let index = self.rng.random_range(0..usize::from(total_cells));
            draws += 1;

            let cell = &mut mine_mask[[index / cols, index % cols]];
            if !*cell {
                *cell = true;
                placed += 1;
            }
        }

        log::trace!("Placed {} mines in {} draws", placed, draws);
        Ok(mine_mask)
    }
}
