use alloc::vec::Vec;
use ndarray::Array2;

use crate::*;
pub use random::*;

mod random;

/// Decides where the mines of a round go.
pub trait MineGenerator {
    /// Produces a `size` mine mask, `true` marks a mine.
    fn generate(&mut self, size: Coord2, mines: CellCount) -> Result<Array2<bool>>;
}

/// Always places mines at the same positions, ignoring the requested count.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMineGenerator {
    mines: Vec<Coord2>,
}

impl FixedMineGenerator {
    pub fn new(mines: impl IntoIterator<Item = Coord2>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }
}

impl MineGenerator for FixedMineGenerator {
    fn generate(&mut self, size: Coord2, mines: CellCount) -> Result<Array2<bool>> {
        let mut mine_mask: Array2<bool> = Array2::default(nd_shape(size));

        for &coords in &self.mines {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let placed = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        if placed != usize::from(mines) {
            log::debug!("Fixed layout has {placed} mines, {mines} requested");
        }
        Ok(mine_mask)
    }
}
