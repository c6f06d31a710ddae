use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::ops::Index;
use ndarray::{Array2, ArrayView1};
use serde::Serialize;

use crate::*;

/// Grid of cells for one configuration, row-major and 1-indexed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
    total_mines: CellCount,
}

impl Board {
    /// Allocates fresh cells for `config`, without any mines.
    pub fn build(config: GameConfig) -> Self {
        let cells = Array2::from_shape_fn(nd_shape(config.size()), |(row, col)| {
            // shape comes from Coord values, both indices fit
            Cell::new((row as Coord + 1, col as Coord + 1))
        });
        Self {
            config,
            cells,
            total_mines: 0,
        }
    }

    /// Clears every cell, then places a new set of mines.
    ///
    /// The layout is generated first, a failing generator leaves the board untouched.
    pub fn reset(&mut self, generator: &mut impl MineGenerator) -> Result<()> {
        let (mine_mask, total_mines) = self.generate_mask(generator)?;
        self.cells.iter_mut().for_each(Cell::clear);
        self.apply_mask(&mine_mask, total_mines);
        Ok(())
    }

    /// Places `config.total_mines()` mines and computes every adjacency count.
    ///
    /// Mines stay where they are for the rest of the round.
    pub fn place_mines(&mut self, generator: &mut impl MineGenerator) -> Result<()> {
        let (mine_mask, total_mines) = self.generate_mask(generator)?;
        self.apply_mask(&mine_mask, total_mines);
        Ok(())
    }

    fn generate_mask(
        &self,
        generator: &mut impl MineGenerator,
    ) -> Result<(Array2<bool>, CellCount)> {
        let mine_mask = generator.generate(self.size(), self.config.total_mines())?;
        if mine_mask.dim() != self.cells.dim() {
            return Err(GameError::InvalidBoardShape);
        }

        let total_mines = mine_mask
            .iter()
            .filter(|&&mine| mine)
            .count()
            .try_into()
            .map_err(|_| GameError::TooManyMines)?;
        Ok((mine_mask, total_mines))
    }

    fn apply_mask(&mut self, mine_mask: &Array2<bool>, total_mines: CellCount) {
        for (cell, &mine) in self.cells.iter_mut().zip(mine_mask.iter()) {
            cell.set_mine(mine);
        }

        let positions: Vec<Coord2> = self.cells.iter().map(Cell::pos).collect();
        for pos in positions {
            let count = self.adjacent_mine_count(pos);
            self.cell_mut(pos).set_adjacent_mines(count);
        }

        self.total_mines = total_mines;
        log::debug!(
            "Placed {} mines on a {}x{} board",
            self.total_mines,
            self.rows(),
            self.cols()
        );
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn rows(&self) -> Coord {
        self.config.rows()
    }

    pub fn cols(&self) -> Coord {
        self.config.cols()
    }

    pub fn mine_ratio(&self) -> u8 {
        self.config.mine_ratio()
    }

    /// Mines actually placed this round.
    pub fn total_mines(&self) -> CellCount {
        self.total_mines
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self[coords])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Cells of one row, `row` starting at 1.
    pub fn row(&self, row: Coord) -> Result<ArrayView1<'_, Cell>> {
        self.validate_coords((row, 1))?;
        Ok(self.cells.row(usize::from(row) - 1))
    }

    pub fn neighbors_of(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.count_neighbors(coords, Cell::is_mine)
    }

    pub fn flagged_neighbor_count(&self, coords: Coord2) -> u8 {
        self.count_neighbors(coords, Cell::is_flagged)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_cells(Cell::is_flagged)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_cells(Cell::is_revealed)
    }

    pub fn has_exploded(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.status() == CellStatus::Exploded)
    }

    /// Every cell is either a mine or revealed, flags do not matter.
    pub fn all_safe_revealed(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.is_mine() || cell.is_revealed())
    }

    /// Reveals an unflagged cell, cascading through blank regions.
    ///
    /// Returns how many cells were revealed, 0 for flagged or already revealed cells.
    pub fn reveal(&mut self, coords: Coord2) -> Result<CellCount> {
        let coords = self.validate_coords(coords)?;
        let cell = &self[coords];

        if cell.is_flagged() || cell.is_revealed() {
            return Ok(0);
        }

        Ok(self.cascade_reveal(coords))
    }

    /// Returns whether the flag changed.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cell_mut(coords).toggle_flag())
    }

    /// Reveals every unflagged neighbor of a numbered cell whose flagged neighbor count matches
    /// its mine count.
    ///
    /// The flags are trusted, a misplaced flag makes this reveal a mine.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<CellCount> {
        let coords = self.validate_coords(coords)?;

        let CellStatus::Numbered(count) = self[coords].status() else {
            return Ok(0);
        };

        let flagged = self.flagged_neighbor_count(coords);
        if flagged != count {
            log::trace!(
                "Chord at {:?} skipped, {} flags for {} mines",
                coords,
                flagged,
                count
            );
            return Ok(0);
        }

        let targets: Vec<Coord2> = self
            .neighbors_of(coords)
            .filter(|&pos| !self[pos].is_flagged() && !self[pos].is_revealed())
            .collect();

        Ok(targets
            .into_iter()
            .map(|pos| self.cascade_reveal(pos))
            .sum())
    }

    /// Reveals `start`, and whenever a cell turns blank forces all of its neighbors open, flagged
    /// ones included.
    fn cascade_reveal(&mut self, start: Coord2) -> CellCount {
        let mut revealed = 0;
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            if !self.cell_mut(coords).force_reveal() {
                continue;
            }
            revealed += 1;

            if self[coords].status() == CellStatus::Blank {
                let before = to_visit.len();
                to_visit.extend(
                    self.neighbors_of(coords)
                        .filter(|&pos| !self[pos].is_revealed()),
                );
                log::trace!(
                    "Blank at {:?}, queued {} neighbors",
                    coords,
                    to_visit.len() - before
                );
            }
        }

        log::debug!("Revealed {} cells from {:?}", revealed, start);
        revealed
    }

    fn count_neighbors(&self, coords: Coord2, predicate: impl Fn(&Cell) -> bool) -> u8 {
        // at most 8 neighbors
        self.neighbors_of(coords)
            .filter(|&pos| predicate(&self[pos]))
            .count() as u8
    }

    fn count_cells(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        // the board has at most CellCount::MAX cells
        self.cells.iter().filter(|cell| predicate(cell)).count() as CellCount
    }

    fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        let config = GameConfig::new(size.0.into(), size.1.into(), 5).unwrap();
        let mut board = Board::build(config);
        board
            .reset(&mut FixedMineGenerator::new(mines.iter().copied()))
            .unwrap();
        board
    }

    fn revealed(board: &Board) -> Vec<Coord2> {
        board
            .cells()
            .filter(|cell| cell.is_revealed())
            .map(Cell::pos)
            .collect()
    }

    #[test]
    fn build_creates_row_major_one_indexed_cells() {
        let board = Board::build(GameConfig::new(5, 6, 10).unwrap());

        let first: Vec<_> = board.cells().take(7).map(Cell::pos).collect();

        assert_eq!(
            first,
            vec![(1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6), (2, 1)]
        );
        assert_eq!(board.total_mines(), 0);
        assert!(board.cells().all(|cell| cell.status() == CellStatus::Hidden));
    }

    #[test]
    fn row_view_follows_columns() {
        let board = board((5, 7), &[(2, 7)]);

        let row: Vec<_> = board.row(2).unwrap().iter().map(Cell::pos).collect();

        assert_eq!(row.len(), 7);
        assert_eq!(row[0], (2, 1));
        assert!(board.row(2).unwrap()[6].is_mine());
        assert_eq!(board.row(6).unwrap_err(), GameError::InvalidCoords);
    }

    #[test]
    fn random_reset_places_configured_mine_count() {
        let config = GameConfig::new(16, 30, 20).unwrap();
        let mut board = Board::build(config);

        board.reset(&mut RandomMineGenerator::new(3)).unwrap();

        assert_eq!(board.total_mines(), 96);
        assert_eq!(board.cells().filter(|cell| cell.is_mine()).count(), 96);
    }

    #[test]
    fn adjacency_counts_moore_neighborhood() {
        let board = board((5, 5), &[(1, 1), (1, 2), (3, 3)]);

        assert_eq!(board[(2, 2)].adjacent_mine_count(), 3);
        assert_eq!(board[(1, 1)].adjacent_mine_count(), 1);
        assert_eq!(board[(5, 5)].adjacent_mine_count(), 0);
        assert_eq!(board[(4, 4)].adjacent_mine_count(), 1);
    }

    #[test]
    fn reveal_numbered_cell_does_not_cascade() {
        let mut board = board((5, 5), &[(1, 1)]);

        assert_eq!(board.reveal((2, 2)).unwrap(), 1);
        assert_eq!(revealed(&board), vec![(2, 2)]);
    }

    #[test]
    fn reveal_blank_cell_opens_region_and_border() {
        let mut board = board((5, 5), &[(1, 1)]);

        let count = board.reveal((5, 5)).unwrap();

        assert_eq!(count, 24);
        assert_eq!(board[(1, 1)].status(), CellStatus::Hidden);
        assert_eq!(board[(1, 2)].status(), CellStatus::Numbered(1));
        assert!(board.all_safe_revealed());
    }

    #[test]
    fn reveal_stops_at_numbered_wall() {
        // a full column of mines splits the board
        let wall: Vec<Coord2> = (1..=5).map(|row| (row, 3)).collect();
        let mut board = board((5, 5), &wall);

        board.reveal((1, 1)).unwrap();

        let opened = revealed(&board);
        assert_eq!(opened.len(), 10);
        assert!(opened.iter().all(|&(_, col)| col <= 2));
    }

    #[test]
    fn flood_fill_overrides_flags() {
        let mut board = board((5, 5), &[(1, 1)]);
        board.toggle_flag((3, 3)).unwrap();

        board.reveal((5, 5)).unwrap();

        assert_eq!(board[(3, 3)].status(), CellStatus::Blank);
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn reveal_ignores_flagged_and_revealed_cells() {
        let mut board = board((5, 5), &[(1, 1)]);
        board.toggle_flag((1, 1)).unwrap();

        assert_eq!(board.reveal((1, 1)).unwrap(), 0);
        assert_eq!(board.reveal((2, 2)).unwrap(), 1);
        assert_eq!(board.reveal((2, 2)).unwrap(), 0);
        assert!(!board.has_exploded());
    }

    #[test]
    fn reveal_mine_explodes() {
        let mut board = board((5, 5), &[(1, 1)]);

        assert_eq!(board.reveal((1, 1)).unwrap(), 1);
        assert_eq!(board[(1, 1)].status(), CellStatus::Exploded);
        assert!(board.has_exploded());
    }

    #[test]
    fn toggle_flag_ignores_revealed_cells() {
        let mut board = board((5, 5), &[(1, 1)]);
        board.reveal((2, 2)).unwrap();

        assert!(!board.toggle_flag((2, 2)).unwrap());
        assert!(board.toggle_flag((1, 1)).unwrap());
        assert_eq!(board.flagged_count(), 1);
    }

    #[test]
    fn chord_reveals_unflagged_neighbors_when_flags_match() {
        let mut board = board((5, 5), &[(1, 1), (1, 3)]);
        board.reveal((2, 2)).unwrap();
        board.toggle_flag((1, 1)).unwrap();
        board.toggle_flag((1, 3)).unwrap();

        let count = board.chord_reveal((2, 2)).unwrap();

        // the lower rows are blank, so the chord cascades through the rest of the board
        assert_eq!(count, 22);
        assert!(!board.has_exploded());
        assert!(board.all_safe_revealed());
        assert_eq!(board[(1, 2)].status(), CellStatus::Numbered(2));
        assert!(board[(1, 1)].is_flagged());
    }

    #[test]
    fn chord_does_nothing_when_counts_differ() {
        let mut board = board((5, 5), &[(1, 1), (1, 3)]);
        board.reveal((2, 2)).unwrap();
        board.toggle_flag((1, 1)).unwrap();

        assert_eq!(board.chord_reveal((2, 2)).unwrap(), 0);
        assert_eq!(revealed(&board), vec![(2, 2)]);
    }

    #[test]
    fn chord_with_misplaced_flag_reveals_mine() {
        let mut board = board((5, 5), &[(1, 1)]);
        board.reveal((2, 2)).unwrap();
        board.toggle_flag((1, 2)).unwrap();

        board.chord_reveal((2, 2)).unwrap();

        assert!(board.has_exploded());
        assert_eq!(board[(1, 1)].status(), CellStatus::Exploded);
    }

    #[test]
    fn chord_ignores_hidden_and_blank_cells() {
        let mut board = board((5, 5), &[(1, 1)]);

        assert_eq!(board.chord_reveal((3, 3)).unwrap(), 0);
        board.reveal((5, 5)).unwrap();
        assert_eq!(board.chord_reveal((5, 5)).unwrap(), 0);
    }

    #[test]
    fn out_of_board_coordinates_are_rejected() {
        let mut board = board((5, 5), &[(1, 1)]);

        assert_eq!(board.reveal((0, 1)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((6, 1)), Err(GameError::InvalidCoords));
        assert_eq!(board.chord_reveal((1, 6)), Err(GameError::InvalidCoords));
        assert!(board.cell((5, 5)).is_ok());
    }

    #[test]
    fn reset_clears_previous_round() {
        let mut board = board((5, 5), &[(1, 1)]);
        board.toggle_flag((1, 1)).unwrap();
        board.reveal((5, 5)).unwrap();

        board
            .reset(&mut FixedMineGenerator::new([(5, 5)]))
            .unwrap();

        assert_eq!(board.flagged_count(), 0);
        assert_eq!(board.revealed_count(), 0);
        assert!(!board[(1, 1)].is_mine());
        assert!(board[(5, 5)].is_mine());
        assert_eq!(board[(4, 4)].adjacent_mine_count(), 1);
    }

    /// Hands out a mask of whatever shape it was built with.
    struct ShapedGenerator(Coord2);

    impl MineGenerator for ShapedGenerator {
        fn generate(&mut self, _size: Coord2, _mines: CellCount) -> Result<Array2<bool>> {
            Ok(Array2::from_elem(nd_shape(self.0), false))
        }
    }

    struct FailingGenerator;

    impl MineGenerator for FailingGenerator {
        fn generate(&mut self, _size: Coord2, _mines: CellCount) -> Result<Array2<bool>> {
            Err(GameError::TooManyMines)
        }
    }

    #[test]
    fn mask_of_wrong_shape_is_rejected() {
        let mut board = board((5, 5), &[(1, 1)]);

        assert_eq!(
            board.reset(&mut ShapedGenerator((5, 6))),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            board.place_mines(&mut ShapedGenerator((6, 5))),
            Err(GameError::InvalidBoardShape)
        );
        assert!(board[(1, 1)].is_mine());
        assert_eq!(board.total_mines(), 1);
    }

    #[test]
    fn failed_reset_keeps_current_round() {
        let mut board = board((5, 5), &[(1, 1)]);
        board.toggle_flag((1, 1)).unwrap();
        board.reveal((5, 5)).unwrap();
        let before = board.clone();

        assert_eq!(
            board.reset(&mut FailingGenerator),
            Err(GameError::TooManyMines)
        );
        assert_eq!(board, before);
        assert_eq!(board.total_mines(), 1);
        assert_eq!(board.flagged_count(), 1);
    }
}
