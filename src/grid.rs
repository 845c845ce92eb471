use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Floor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in grid units.
    pub fn distance(self, other: Pos) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(self, dx: isize, dy: isize) -> Option<Pos> {
        let x = self.x as isize + dx;
        let y = self.y as isize + dy;
        if x < 0 || y < 0 {
            return None;
        }
        Some(Pos {
            x: x as usize,
            y: y as usize,
        })
    }
}

pub(crate) const DIRS: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Wall/floor layout of one maze. Row-major, indexed `cells[y][x]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn all_walls(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::Wall; width]; height],
        }
    }

    /// Builds a grid from rows of `#` (wall) and anything else (floor).
    /// Rows shorter than the first are padded with walls.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut grid = Self::all_walls(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().take(width).enumerate() {
                if ch != '#' {
                    grid.cells[y][x] = Cell::Floor;
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Out-of-bounds positions read as walls.
    pub fn get(&self, pos: Pos) -> Cell {
        if self.in_bounds(pos) {
            self.cells[pos.y][pos.x]
        } else {
            Cell::Wall
        }
    }

    pub fn is_floor(&self, pos: Pos) -> bool {
        self.get(pos) == Cell::Floor
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        if self.in_bounds(pos) {
            self.cells[pos.y][pos.x] = cell;
        }
    }

    pub fn floor_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y][x] == Cell::Floor {
                    cells.push(Pos { x, y });
                }
            }
        }
        cells
    }

    pub fn wall_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y][x] == Cell::Wall {
                    cells.push(Pos { x, y });
                }
            }
        }
        cells
    }

    /// Number of the four axis neighbours that are floor.
    pub fn open_neighbors(&self, pos: Pos) -> usize {
        DIRS.iter()
            .filter_map(|&(dx, dy)| pos.offset(dx, dy))
            .filter(|&n| self.is_floor(n))
            .count()
    }

    /// Floor cells reachable from `start` through 4-connected floor.
    pub fn reachable_from(&self, start: Pos) -> Vec<Vec<bool>> {
        self.distances_from(start)
            .into_iter()
            .map(|row| row.into_iter().map(|d| d.is_some()).collect())
            .collect()
    }

    /// Walking distance in cells from `start` to every reachable floor
    /// cell; `None` for walls and unreachable floor.
    pub fn distances_from(&self, start: Pos) -> Vec<Vec<Option<usize>>> {
        let mut dist = vec![vec![None; self.width]; self.height];
        if !self.is_floor(start) {
            return dist;
        }
        let mut q = VecDeque::new();
        dist[start.y][start.x] = Some(0);
        q.push_back((start, 0));
        while let Some((pos, d)) = q.pop_front() {
            for (dx, dy) in DIRS {
                let Some(next) = pos.offset(dx, dy) else {
                    continue;
                };
                if !self.is_floor(next) || dist[next.y][next.x].is_some() {
                    continue;
                }
                dist[next.y][next.x] = Some(d + 1);
                q.push_back((next, d + 1));
            }
        }
        dist
    }
}
