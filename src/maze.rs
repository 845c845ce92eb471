//! Maze generation: randomized depth-first carving plus an optional
//! loop pass that opens walls between parallel corridors.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Grid, Pos, DIRS};
use crate::movement::{Rect, Vec2};

/// Interior coordinate the carve starts from. Item placement measures its
/// distances from here too.
pub const MAZE_START: Pos = Pos::new(1, 1);

pub const DEFAULT_LOOP_CHANCE: f64 = 0.08;

/// Size of the opening room and spacing of the carved passages. Passages
/// are always one cell wide; wider styles leave thicker walls between
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CarveStyle {
    Classic,
    Wide,
    Broad,
}

impl CarveStyle {
    /// Side of the square seed block opened at [`MAZE_START`].
    pub fn width(self) -> usize {
        match self {
            CarveStyle::Classic => 1,
            CarveStyle::Wide => 2,
            CarveStyle::Broad => 3,
        }
    }

    /// Distance between neighbouring carve coordinates.
    pub fn step(self) -> usize {
        self.width() + 1
    }

    /// Smallest width/height that still fits the seed block inside a
    /// one-cell border.
    pub fn min_dimension(self) -> usize {
        (self.width() + 2).max(5)
    }
}

/// Carves a perfect maze of one-cell passages. Every border cell stays
/// wall.
///
/// Panics if `width`/`height` are below [`CarveStyle::min_dimension`];
/// callers validate dimensions once at configuration time.
pub fn generate(width: usize, height: usize, style: CarveStyle, rng: &mut impl Rng) -> Grid {
    let min = style.min_dimension();
    assert!(
        width >= min && height >= min,
        "maze {width}x{height} too small for {style:?} (need at least {min}x{min})"
    );

    let mut grid = Grid::all_walls(width, height);
    let w = style.width();
    for y in MAZE_START.y..MAZE_START.y + w {
        for x in MAZE_START.x..MAZE_START.x + w {
            grid.set(Pos { x, y }, Cell::Floor);
        }
    }

    let mut stack = vec![MAZE_START];
    while let Some(&current) = stack.last() {
        let targets = carve_targets(&grid, current, style);
        match targets.choose(rng) {
            Some(&next) => {
                carve_between(&mut grid, current, next);
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }

    grid
}

fn carve_targets(grid: &Grid, current: Pos, style: CarveStyle) -> Vec<Pos> {
    let step = style.step() as isize;
    let mut targets = Vec::new();
    for (dx, dy) in DIRS {
        let Some(next) = current.offset(dx * step, dy * step) else {
            continue;
        };
        if is_interior(grid, next)
            && grid.get(next) == Cell::Wall
            && open_at_step(grid, next, style) <= 1
        {
            targets.push(next);
        }
    }
    targets
}

fn is_interior(grid: &Grid, pos: Pos) -> bool {
    pos.x > 0 && pos.y > 0 && pos.x + 1 < grid.width() && pos.y + 1 < grid.height()
}

/// Open carve coordinates one step away; more than one means carving here
/// would merge two corridors.
fn open_at_step(grid: &Grid, pos: Pos, style: CarveStyle) -> usize {
    let step = style.step() as isize;
    DIRS.iter()
        .filter_map(|&(dx, dy)| pos.offset(dx * step, dy * step))
        .filter(|&n| grid.is_floor(n))
        .count()
}

/// Opens the straight run of cells from `a` to `b`, both ends included.
fn carve_between(grid: &mut Grid, a: Pos, b: Pos) {
    for y in a.y.min(b.y)..=a.y.max(b.y) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            grid.set(Pos { x, y }, Cell::Floor);
        }
    }
}

/// Cuts shortcuts between parallel corridors. The carve leaves a wall
/// coordinate wherever opening it would have joined two corridors; each
/// such coordinate whose neighbours one step above and below (first pass)
/// or left and right (second pass) are both open gets an independent
/// `chance` of being opened together with both runs to those neighbours.
/// Returns the number of shortcuts cut.
///
/// `chance` must be within `0.0..=1.0`.
pub fn inject_loops(grid: &mut Grid, style: CarveStyle, chance: f64, rng: &mut impl Rng) -> usize {
    let step = style.step();
    let mut opened = 0;
    for (dx, dy) in [(0isize, 1isize), (1, 0)] {
        let (sx, sy) = (dx * step as isize, dy * step as isize);
        for y in (MAZE_START.y..grid.height()).step_by(step) {
            for x in (MAZE_START.x..grid.width()).step_by(step) {
                let pos = Pos { x, y };
                if !is_interior(grid, pos) || grid.get(pos) != Cell::Wall {
                    continue;
                }
                let (Some(before), Some(after)) = (pos.offset(-sx, -sy), pos.offset(sx, sy))
                else {
                    continue;
                };
                if grid.is_floor(before) && grid.is_floor(after) && rng.gen_bool(chance) {
                    carve_between(grid, before, after);
                    opened += 1;
                }
            }
        }
    }
    opened
}

/// One square obstacle per wall cell, centred on the cell.
pub fn obstacles(grid: &Grid, cell_size: f32) -> Vec<Rect> {
    let half = cell_size / 2.0;
    grid.wall_cells()
        .into_iter()
        .map(|pos| Rect::new(cell_center(pos, cell_size), Vec2::new(half, half)))
        .collect()
}

pub fn cell_center(pos: Pos, cell_size: f32) -> Vec2 {
    Vec2::new(
        pos.x as f32 * cell_size + cell_size / 2.0,
        pos.y as f32 * cell_size + cell_size / 2.0,
    )
}
