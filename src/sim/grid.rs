//! Level grid and cell queries
//!
//! A level keeps two row-major copies of its cells: the template produced by
//! generation and the working copy that collision checks read.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use crate::consts::CELL_SIZE;
use crate::wrap_coord;

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Clear,
    /// Harmless obstacle, blocks movement with a thump
    Thump,
    /// Lethal obstacle
    Lethal,
    /// Invisible but solid corner filler, lethal like `Lethal`
    Hidden,
}

impl Cell {
    /// Integer tag used by level data
    pub const fn tag(self) -> u8 {
        match self {
            Cell::Clear => 0,
            Cell::Thump => 1,
            Cell::Lethal => 2,
            Cell::Hidden => 10,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, SimError> {
        match tag {
            0 => Ok(Cell::Clear),
            1 => Ok(Cell::Thump),
            2 => Ok(Cell::Lethal),
            10 => Ok(Cell::Hidden),
            other => Err(SimError::UnknownCell(other)),
        }
    }

    #[inline]
    pub fn is_clear(self) -> bool {
        self == Cell::Clear
    }

    /// Whether moving into this cell kills the snake
    #[inline]
    pub fn is_lethal(self) -> bool {
        matches!(self, Cell::Lethal | Cell::Hidden)
    }
}

/// A rectangular level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    width: i32,
    height: i32,
    cell_size: u32,
    working: Vec<Cell>,
    original: Vec<Cell>,
}

impl Level {
    /// Create an all-clear level
    pub fn new(width: i32, height: i32) -> Result<Self, SimError> {
        if width < 1 || height < 1 {
            return Err(SimError::EmptyGrid { width, height });
        }
        let cells = vec![Cell::Clear; (width * height) as usize];
        Ok(Self {
            width,
            height,
            cell_size: CELL_SIZE,
            working: cells.clone(),
            original: cells,
        })
    }

    /// Build a level from raw cell tags
    ///
    /// Short data is padded with clear cells; data longer than the grid or
    /// holding unknown tags is rejected.
    pub fn from_data(width: i32, height: i32, data: &[u8]) -> Result<Self, SimError> {
        let mut level = Self::new(width, height)?;
        let expected = level.original.len();
        if data.len() > expected {
            return Err(SimError::LevelData {
                expected,
                actual: data.len(),
            });
        }
        for (i, &tag) in data.iter().enumerate() {
            let cell = Cell::from_tag(tag)?;
            level.original[i] = cell;
            level.working[i] = cell;
        }
        Ok(level)
    }

    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Row-major index of an in-range coordinate
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Wrap a position onto the grid
    #[inline]
    pub fn wrap(&self, pos: IVec2) -> IVec2 {
        IVec2::new(wrap_coord(pos.x, self.width), wrap_coord(pos.y, self.height))
    }

    /// Working-grid cell at `pos` (wrapped onto the grid)
    pub fn cell(&self, pos: IVec2) -> Cell {
        let pos = self.wrap(pos);
        self.working[self.index(pos.x, pos.y)]
    }

    /// Overwrite a working-grid cell; the template is untouched
    pub fn set_cell(&mut self, pos: IVec2, cell: Cell) {
        let pos = self.wrap(pos);
        let i = self.index(pos.x, pos.y);
        self.working[i] = cell;
    }

    /// Write a cell into both the template and the working grid
    pub(crate) fn set_template(&mut self, pos: IVec2, cell: Cell) {
        let pos = self.wrap(pos);
        let i = self.index(pos.x, pos.y);
        self.working[i] = cell;
        self.original[i] = cell;
    }

    /// Live cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.working
    }

    /// Template cells, row-major
    pub fn original(&self) -> &[Cell] {
        &self.original
    }

    /// Restore the working grid from the template
    pub fn reset(&mut self) {
        self.working.copy_from_slice(&self.original);
    }

    /// Sample a clear cell not listed in `exclude`
    ///
    /// Gives up after `width * height` random draws and returns `None`, so a
    /// saturated grid never loops forever.
    pub fn empty_cell<R: Rng>(&self, rng: &mut R, exclude: &[IVec2]) -> Option<IVec2> {
        self.empty_cell_by(rng, |pos| exclude.contains(&pos))
    }

    /// Like [`Level::empty_cell`] with an arbitrary exclusion test
    pub fn empty_cell_by<R, F>(&self, rng: &mut R, excluded: F) -> Option<IVec2>
    where
        R: Rng,
        F: Fn(IVec2) -> bool,
    {
        for _ in 0..self.working.len() {
            let pos = IVec2::new(
                rng.random_range(0..self.width),
                rng.random_range(0..self.height),
            );
            if self.cell(pos).is_clear() && !excluded(pos) {
                return Some(pos);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_index_is_row_major() {
        let level = Level::new(7, 4).unwrap();
        assert_eq!(level.index(0, 0), 0);
        assert_eq!(level.index(6, 0), 6);
        assert_eq!(level.index(0, 1), 7);
        assert_eq!(level.index(3, 2), 17);
        assert_eq!(level.len(), 28);
    }

    #[test]
    fn test_from_data_pads_short_input() {
        let level = Level::from_data(3, 2, &[1, 2, 10]).unwrap();
        assert_eq!(
            level.cells(),
            &[Cell::Thump, Cell::Lethal, Cell::Hidden, Cell::Clear, Cell::Clear, Cell::Clear]
        );
        assert_eq!(level.cells(), level.original());
    }

    #[test]
    fn test_from_data_rejects_bad_input() {
        assert_eq!(
            Level::from_data(2, 2, &[0; 5]),
            Err(SimError::LevelData {
                expected: 4,
                actual: 5
            })
        );
        assert_eq!(Level::from_data(2, 2, &[0, 3]), Err(SimError::UnknownCell(3)));
        assert_eq!(
            Level::new(0, 5),
            Err(SimError::EmptyGrid {
                width: 0,
                height: 5
            })
        );
    }

    #[test]
    fn test_reset_restores_template() {
        let mut level = Level::from_data(3, 3, &[0, 2, 0, 0, 0, 0, 1, 0, 0]).unwrap();
        level.set_cell(IVec2::new(1, 1), Cell::Lethal);
        level.set_cell(IVec2::new(1, 0), Cell::Clear);
        assert_ne!(level.cells(), level.original());

        level.reset();
        assert_eq!(level.cells(), level.original());
        level.reset();
        assert_eq!(level.cells(), level.original());
    }

    #[test]
    fn test_cell_lookup_wraps() {
        let level = Level::from_data(3, 2, &[0, 0, 2, 0, 0, 0]).unwrap();
        assert_eq!(level.cell(IVec2::new(-1, 0)), Cell::Lethal);
        assert_eq!(level.cell(IVec2::new(2, 2)), Cell::Lethal);
    }

    #[test]
    fn test_empty_cell_avoids_obstacles_and_exclusions() {
        let mut rng = Pcg32::seed_from_u64(7);
        // Only (1,1) and (2,1) are clear; (1,1) is excluded
        let level = Level::from_data(3, 2, &[2, 1, 10, 2, 0, 0]).unwrap();
        for _ in 0..50 {
            if let Some(pos) = level.empty_cell(&mut rng, &[IVec2::new(1, 1)]) {
                assert_eq!(pos, IVec2::new(2, 1));
            }
        }
    }

    #[test]
    fn test_empty_cell_on_saturated_grid_gives_up() {
        let mut rng = Pcg32::seed_from_u64(1);
        let level = Level::from_data(4, 4, &[2; 16]).unwrap();
        assert_eq!(level.empty_cell(&mut rng, &[]), None);

        let open = Level::new(2, 1).unwrap();
        let everything = [IVec2::new(0, 0), IVec2::new(1, 0)];
        assert_eq!(open.empty_cell(&mut rng, &everything), None);
    }
}
