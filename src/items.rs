//! Dead-end search, spaced collectible placement, and pick-up tracking.

use log::debug;

use crate::grid::{Grid, Pos};
use crate::maze::cell_center;
use crate::movement::Rect;
use crate::visibility::{RevealState, VisibilityTracker};

/// Floor cells with exactly one open neighbour, in row-major order.
pub fn find_dead_ends(grid: &Grid) -> Vec<Pos> {
    grid.floor_cells()
        .into_iter()
        .filter(|&pos| grid.open_neighbors(pos) == 1)
        .collect()
}

pub fn min_distance_from_origin(grid: &Grid) -> f64 {
    grid.width().max(grid.height()) as f64 / 3.0
}

pub fn min_distance_between_items(grid: &Grid) -> f64 {
    grid.width().max(grid.height()) as f64 / 4.0
}

/// Picks up to `max_items` dead ends, farthest from `origin` first, that
/// are far enough from the origin and from each other. Returns fewer when
/// the maze does not have enough suitable dead ends.
pub fn place_items(grid: &Grid, origin: Pos, max_items: usize) -> Vec<Pos> {
    let from_origin = min_distance_from_origin(grid);
    let between = min_distance_between_items(grid);

    let mut candidates: Vec<(Pos, f64)> = find_dead_ends(grid)
        .into_iter()
        .map(|pos| (pos, pos.distance(origin)))
        .filter(|&(_, d)| d >= from_origin)
        .collect();
    // Stable, so equal distances keep row-major order.
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut placed: Vec<Pos> = Vec::new();
    for (pos, _) in candidates {
        if placed.len() >= max_items {
            break;
        }
        if placed.iter().all(|p| p.distance(pos) >= between) {
            placed.push(pos);
        }
    }
    placed
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub cell: Pos,
    pub bounds: Rect,
    pub collected: bool,
}

impl Item {
    pub fn new(cell: Pos, cell_size: f32, size: f32) -> Self {
        Self {
            cell,
            bounds: Rect::square(cell_center(cell, cell_size), size / 2.0),
            collected: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Collected { cell: Pos, count: usize },
    AllCollected { count: usize },
}

/// The level's collectibles and the running pick-up count.
pub struct Collectibles {
    items: Vec<Item>,
    collected: usize,
    target: usize,
}

impl Collectibles {
    pub fn new(items: Vec<Item>, target: usize) -> Self {
        Self {
            items,
            collected: 0,
            target,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn remaining(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| !item.collected)
    }

    pub fn collected(&self) -> usize {
        self.collected
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn is_complete(&self) -> bool {
        self.collected >= self.target
    }

    /// Collects every remaining item that overlaps `player` and is not
    /// still hidden in the fog.
    pub fn collect_touching(
        &mut self,
        player: &Rect,
        tracker: &VisibilityTracker,
    ) -> Vec<Collection> {
        let mut events = Vec::new();
        for item in self.items.iter_mut().filter(|item| !item.collected) {
            if tracker.reveal_state_of(item.cell) == RevealState::Hidden {
                continue;
            }
            if !player.overlaps(&item.bounds) {
                continue;
            }
            item.collected = true;
            self.collected += 1;
            debug!(
                "collected item at ({}, {}), {}/{}",
                item.cell.x, item.cell.y, self.collected, self.target
            );
            events.push(Collection::Collected {
                cell: item.cell,
                count: self.collected,
            });
            if self.collected == self.target {
                events.push(Collection::AllCollected {
                    count: self.collected,
                });
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Vec2;

    #[test]
    fn single_branch_has_one_dead_end() {
        // A 2x2 room with one stub sticking out of it.
        let grid = Grid::from_rows(&["#####", "#...#", "#..##", "#####", "#####"]);
        assert_eq!(find_dead_ends(&grid), vec![Pos::new(3, 1)]);
    }

    #[test]
    fn corridor_has_two_dead_ends() {
        let grid = Grid::from_rows(&["#####", "#...#", "#####"]);
        assert_eq!(find_dead_ends(&grid), vec![Pos::new(1, 1), Pos::new(3, 1)]);
    }

    #[test]
    fn isolated_floor_is_not_a_dead_end() {
        let grid = Grid::from_rows(&["###", "#.#", "###"]);
        assert!(find_dead_ends(&grid).is_empty());
    }

    #[test]
    fn placement_prefers_far_and_spaced_dead_ends() {
        // A comb: one long horizontal corridor with teeth hanging down.
        let grid = Grid::from_rows(&[
            "#############",
            "#...........#",
            "#.#.#.#.#.#.#",
            "#############",
        ]);
        let placed = place_items(&grid, Pos::new(1, 1), 3);
        // min from origin = 13/3, min between = 13/4.
        assert_eq!(placed, vec![Pos::new(11, 2), Pos::new(7, 2)]);
    }

    #[test]
    fn placement_respects_max_items() {
        let grid = Grid::from_rows(&[
            "#############",
            "#...........#",
            "#.#.#.#.#.#.#",
            "#############",
        ]);
        assert_eq!(place_items(&grid, Pos::new(1, 1), 1), vec![Pos::new(11, 2)]);
        assert!(place_items(&grid, Pos::new(1, 1), 0).is_empty());
    }

    #[test]
    fn sparse_maze_places_fewer_items() {
        let grid = Grid::from_rows(&["#####", "#...#", "#####"]);
        assert_eq!(place_items(&grid, Pos::new(1, 1), 3), vec![Pos::new(3, 1)]);
        let grid = Grid::from_rows(&["###", "#.#", "###"]);
        assert!(place_items(&grid, Pos::new(1, 1), 3).is_empty());
    }

    fn collectibles_at(cells: &[Pos]) -> Collectibles {
        let items = cells.iter().map(|&c| Item::new(c, 32.0, 32.0 / 6.0)).collect();
        Collectibles::new(items, 2)
    }

    #[test]
    fn hidden_items_cannot_be_collected() {
        let mut coins = collectibles_at(&[Pos::new(1, 1)]);
        let tracker = VisibilityTracker::new(5, 5, 1);
        let player = Rect::square(Vec2::new(48.0, 48.0), 14.4);
        assert!(coins.collect_touching(&player, &tracker).is_empty());
        assert_eq!(coins.collected(), 0);
    }

    #[test]
    fn collecting_reaches_target_once() {
        let mut coins = collectibles_at(&[Pos::new(1, 1), Pos::new(2, 1)]);
        let mut tracker = VisibilityTracker::new(5, 5, 2);
        tracker.update(Pos::new(1, 1));

        let player = Rect::square(Vec2::new(48.0, 48.0), 14.4);
        let events = coins.collect_touching(&player, &tracker);
        assert_eq!(
            events,
            vec![Collection::Collected {
                cell: Pos::new(1, 1),
                count: 1
            }]
        );
        assert!(coins.collect_touching(&player, &tracker).is_empty());

        let player = Rect::square(Vec2::new(80.0, 48.0), 14.4);
        let events = coins.collect_touching(&player, &tracker);
        assert_eq!(
            events,
            vec![
                Collection::Collected {
                    cell: Pos::new(2, 1),
                    count: 2
                },
                Collection::AllCollected { count: 2 },
            ]
        );
        assert!(coins.is_complete());
        assert_eq!(coins.remaining().count(), 0);
    }
}
