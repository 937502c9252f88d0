//! Procedural level generation
//!
//! Levels get an optional border with openings in the middle of each edge and
//! a handful of short lethal lines that point toward the center of the grid.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::grid::{Cell, Level};
use crate::consts::*;

/// Parameters for one generated level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelParams {
    pub width: i32,
    pub height: i32,
    pub obstacles: u32,
    pub outer_walls: bool,
}

impl LevelParams {
    /// Fixed layouts: a 30x30 grid with 5, 5, 2 and 1 obstacle lines
    pub const PRESETS: [LevelParams; 4] = [
        LevelParams::walled(GRID_WIDTH, GRID_HEIGHT, 5),
        LevelParams::walled(GRID_WIDTH, GRID_HEIGHT, 5),
        LevelParams::walled(GRID_WIDTH, GRID_HEIGHT, 2),
        LevelParams::walled(GRID_WIDTH, GRID_HEIGHT, 1),
    ];

    pub const fn walled(width: i32, height: i32, obstacles: u32) -> Self {
        Self {
            width,
            height,
            obstacles,
            outer_walls: true,
        }
    }

    /// One of the fixed layouts
    pub fn preset(index: usize) -> Result<Self, SimError> {
        Self::PRESETS
            .get(index)
            .copied()
            .ok_or(SimError::UnknownPreset(index))
    }

    /// Level with an obstacle count drawn from `min..=max`
    pub fn rolled<R: Rng>(
        width: i32,
        height: i32,
        outer_walls: bool,
        min: u32,
        max: u32,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        if min > max {
            return Err(SimError::ObstacleRange { min, max });
        }
        Ok(Self {
            width,
            height,
            obstacles: rng.random_range(min..=max),
            outer_walls,
        })
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Level, SimError> {
        generate(self.width, self.height, self.obstacles, self.outer_walls, rng)
    }
}

/// Generate a level
pub fn generate<R: Rng>(
    width: i32,
    height: i32,
    obstacle_count: u32,
    outer_walls: bool,
    rng: &mut R,
) -> Result<Level, SimError> {
    let mut level = Level::new(width, height)?;

    if outer_walls {
        build_outer_walls(&mut level, rng);
    }

    let mut laid = 0;
    for _ in 0..obstacle_count {
        laid += lay_obstacle(&mut level, rng).len();
    }

    log::debug!(
        "Generated {}x{} level with {} obstacle lines, {} cells (walls: {})",
        width,
        height,
        obstacle_count,
        laid,
        outer_walls
    );
    Ok(level)
}

/// Random odd opening size for an edge of `extent` cells
fn gap_size<R: Rng>(extent: i32, rng: &mut R) -> i32 {
    let mut gap = rng.random_range(0..(extent / 2).max(1));
    if gap % 2 == 0 {
        gap -= 1;
    }
    gap.max(1)
}

/// Whether `i` along an edge of `extent` cells is wall rather than opening
///
/// The wall run from each end is `(extent - 2 - gap) / 2` cells, kept in
/// doubled integer form so odd remainders split the same way on both ends.
fn is_wall(i: i32, extent: i32, gap: i32) -> bool {
    let run2 = extent - 2 - gap;
    2 * i < run2 || 2 * i > 2 * extent - run2 - 2
}

fn build_outer_walls<R: Rng>(level: &mut Level, rng: &mut R) {
    let (w, h) = (level.width(), level.height());

    // top, bottom, left, right
    let mut kinds = [Cell::Thump; 4];
    for kind in &mut kinds {
        *kind = if rng.random_bool(0.5) {
            Cell::Thump
        } else {
            Cell::Lethal
        };
    }

    let h_gap = gap_size(w, rng);
    let v_gap = gap_size(h, rng);

    for x in 1..w - 1 {
        if is_wall(x, w, h_gap) {
            level.set_template(IVec2::new(x, 0), kinds[0]);
            level.set_template(IVec2::new(x, h - 1), kinds[1]);
        }
    }
    for y in 1..h - 1 {
        if is_wall(y, h, v_gap) {
            level.set_template(IVec2::new(0, y), kinds[2]);
            level.set_template(IVec2::new(w - 1, y), kinds[3]);
        }
    }

    for corner in [
        IVec2::new(0, 0),
        IVec2::new(w - 1, 0),
        IVec2::new(w - 1, h - 1),
        IVec2::new(0, h - 1),
    ] {
        level.set_template(corner, Cell::Hidden);
    }
}

/// Lay one diagonal lethal line growing toward the center
///
/// Returns the cells written, seed first.
fn lay_obstacle<R: Rng>(level: &mut Level, rng: &mut R) -> Vec<IVec2> {
    let (w, h) = (level.width(), level.height());
    if w <= 2 * OBSTACLE_MARGIN || h <= 2 * OBSTACLE_MARGIN {
        log::warn!("Grid {}x{} too small for obstacle lines", w, h);
        return Vec::new();
    }

    let mut pos = IVec2::new(
        rng.random_range(OBSTACLE_MARGIN..w - OBSTACLE_MARGIN),
        rng.random_range(OBSTACLE_MARGIN..h - OBSTACLE_MARGIN),
    );
    let len = rng.random_range(OBSTACLE_MIN_LEN..=OBSTACLE_MAX_LEN);
    let step = IVec2::new(
        if 2 * pos.x < w { 1 } else { -1 },
        if 2 * pos.y < h { 1 } else { -1 },
    );

    let mut laid = Vec::with_capacity(len as usize);
    for _ in 0..len {
        if !level.cell(pos).is_clear() {
            break;
        }
        level.set_template(pos, Cell::Lethal);
        laid.push(pos);
        pos = level.wrap(pos + step);
    }
    laid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn count(level: &Level, cell: Cell) -> usize {
        level.cells().iter().filter(|&&c| c == cell).count()
    }

    #[test]
    fn test_gap_is_odd_and_positive() {
        let mut rng = Pcg32::seed_from_u64(3);
        for extent in [8, 9, 20, 30, 31] {
            for _ in 0..100 {
                let gap = gap_size(extent, &mut rng);
                assert!(gap >= 1);
                assert_eq!(gap % 2, 1);
                assert!(gap < extent / 2);
            }
        }
    }

    #[test]
    fn test_is_wall_leaves_centered_opening() {
        // 30 cells, gap 3: run of 12.5 -> walls at 1..=12 and 17..=28
        let walls: Vec<i32> = (1..29).filter(|&i| is_wall(i, 30, 3)).collect();
        let opening: Vec<i32> = (1..29).filter(|&i| !is_wall(i, 30, 3)).collect();
        assert_eq!(opening, vec![13, 14, 15, 16]);
        assert_eq!(walls.len(), 24);
    }

    #[test]
    fn test_outer_walls_have_openings_and_hidden_corners() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..20 {
            let level = generate(30, 30, 0, true, &mut rng).unwrap();
            for corner in [(0, 0), (29, 0), (29, 29), (0, 29)] {
                assert_eq!(level.cell(IVec2::new(corner.0, corner.1)), Cell::Hidden);
            }
            let top_open = (1..29).any(|x| level.cell(IVec2::new(x, 0)).is_clear());
            let left_open = (1..29).any(|y| level.cell(IVec2::new(0, y)).is_clear());
            assert!(top_open && left_open);
            // Interior untouched without obstacles
            for y in 1..29 {
                for x in 1..29 {
                    assert!(level.cell(IVec2::new(x, y)).is_clear());
                }
            }
            assert_eq!(level.cells(), level.original());
        }
    }

    #[test]
    fn test_no_walls_means_open_border() {
        let mut rng = Pcg32::seed_from_u64(5);
        let level = generate(12, 10, 0, false, &mut rng).unwrap();
        assert_eq!(count(&level, Cell::Clear), 120);
    }

    #[test]
    fn test_obstacles_stay_lethal_and_bounded() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            let level = generate(30, 30, 1, false, &mut rng).unwrap();
            let lethal = count(&level, Cell::Lethal);
            assert!((3..=7).contains(&lethal), "line length {lethal}");
            assert_eq!(count(&level, Cell::Thump), 0);
        }
    }

    #[test]
    fn test_obstacles_never_overwrite() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut level = Level::new(16, 16).unwrap();
        for _ in 0..200 {
            lay_obstacle(&mut level, &mut rng);
        }
        // Every written cell is lethal; nothing was turned back or over
        assert!(level.cells().iter().all(|&c| c == Cell::Clear || c == Cell::Lethal));
        assert!(count(&level, Cell::Lethal) > 0);
    }

    #[test]
    fn test_obstacle_seed_in_margin_and_steps_inward() {
        let mut rng = Pcg32::seed_from_u64(21);
        for (w, h) in [(30, 30), (12, 20), (9, 9)] {
            for _ in 0..100 {
                let mut level = Level::new(w, h).unwrap();
                let line = lay_obstacle(&mut level, &mut rng);
                let len = line.len() as i32;
                assert!((OBSTACLE_MIN_LEN..=OBSTACLE_MAX_LEN).contains(&len));

                let seed = line[0];
                assert!((OBSTACLE_MARGIN..w - OBSTACLE_MARGIN).contains(&seed.x), "seed {seed}");
                assert!((OBSTACLE_MARGIN..h - OBSTACLE_MARGIN).contains(&seed.y), "seed {seed}");

                let inward = IVec2::new(
                    if 2 * seed.x < w { 1 } else { -1 },
                    if 2 * seed.y < h { 1 } else { -1 },
                );
                for pair in line.windows(2) {
                    assert_eq!(level.wrap(pair[0] + inward), pair[1]);
                }
                for pos in &line {
                    assert_eq!(level.cell(*pos), Cell::Lethal);
                }
            }
        }
    }

    #[test]
    fn test_rolled_params_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let params =
                LevelParams::rolled(30, 30, true, MIN_OBSTACLES, MAX_OBSTACLES, &mut rng).unwrap();
            assert!((MIN_OBSTACLES..=MAX_OBSTACLES).contains(&params.obstacles));
            assert!(params.outer_walls);
        }
        assert_eq!(
            LevelParams::rolled(30, 30, true, 5, 2, &mut rng),
            Err(SimError::ObstacleRange { min: 5, max: 2 })
        );
    }

    #[test]
    fn test_presets() {
        assert_eq!(LevelParams::preset(3).unwrap().obstacles, 1);
        assert_eq!(LevelParams::preset(4), Err(SimError::UnknownPreset(4)));

        let mut rng = Pcg32::seed_from_u64(2);
        let level = LevelParams::preset(2).unwrap().generate(&mut rng).unwrap();
        assert_eq!(level.width(), GRID_WIDTH);
        assert_eq!(level.cell(IVec2::ZERO), Cell::Hidden);
    }
}
