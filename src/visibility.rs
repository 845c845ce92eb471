//! Fog of war: which cells the player sees now, has seen before, or has
//! never seen.

use log::debug;

use crate::grid::Pos;
use crate::movement::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    Visible,
    Remembered,
    Hidden,
}

impl RevealState {
    /// Reveal strength for presentation: fully shown, half shown, or not
    /// shown at all.
    pub fn opacity(self) -> f32 {
        match self {
            RevealState::Visible => 1.0,
            RevealState::Remembered => 0.5,
            RevealState::Hidden => 0.0,
        }
    }
}

pub struct VisibilityTracker {
    width: usize,
    height: usize,
    radius: u32,
    visited: Vec<Vec<bool>>,
    states: Vec<Vec<RevealState>>,
    player: Option<Pos>,
}

impl VisibilityTracker {
    pub fn new(width: usize, height: usize, radius: u32) -> Self {
        Self {
            width,
            height,
            radius,
            visited: vec![vec![false; width]; height],
            states: vec![vec![RevealState::Hidden; width]; height],
            player: None,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn player_cell(&self) -> Option<Pos> {
        self.player
    }

    /// Records the player standing at `player`: every cell within the
    /// radius becomes visited, then the per-cell snapshot is rebuilt.
    /// Returns how many cells were visited for the first time.
    pub fn update(&mut self, player: Pos) -> usize {
        self.player = Some(player);
        let r = self.radius as usize;
        let radius = f64::from(self.radius);

        let mut newly = 0;
        let y0 = player.y.saturating_sub(r);
        let x0 = player.x.saturating_sub(r);
        for y in y0..=(player.y + r).min(self.height.saturating_sub(1)) {
            for x in x0..=(player.x + r).min(self.width.saturating_sub(1)) {
                if player.distance(Pos { x, y }) <= radius && !self.visited[y][x] {
                    self.visited[y][x] = true;
                    newly += 1;
                }
            }
        }

        for y in 0..self.height {
            for x in 0..self.width {
                self.states[y][x] = self.reveal_state_of(Pos { x, y });
            }
        }

        debug!(
            "visibility update at ({}, {}): {newly} cells newly visited",
            player.x, player.y
        );
        newly
    }

    /// Snapshot from the latest `update`. Out-of-bounds cells are hidden.
    pub fn state_at(&self, cell: Pos) -> RevealState {
        self.states
            .get(cell.y)
            .and_then(|row| row.get(cell.x))
            .copied()
            .unwrap_or(RevealState::Hidden)
    }

    /// Same three-way rule as the snapshot, evaluated against the current
    /// player cell.
    pub fn reveal_state_of(&self, cell: Pos) -> RevealState {
        let Some(player) = self.player else {
            return RevealState::Hidden;
        };
        if player.distance(cell) <= f64::from(self.radius) {
            RevealState::Visible
        } else if self.is_visited(cell) {
            RevealState::Remembered
        } else {
            RevealState::Hidden
        }
    }

    /// Reveal state of a world-space point, such as an item's centre.
    pub fn reveal_state_of_point(&self, point: Vec2, cell_size: f32) -> RevealState {
        if point.x < 0.0 || point.y < 0.0 {
            return RevealState::Hidden;
        }
        let cell = Pos {
            x: (point.x / cell_size).floor() as usize,
            y: (point.y / cell_size).floor() as usize,
        };
        self.reveal_state_of(cell)
    }

    pub fn is_visited(&self, cell: Pos) -> bool {
        self.visited
            .get(cell.y)
            .and_then(|row| row.get(cell.x))
            .copied()
            .unwrap_or(false)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.iter().flatten().filter(|&&v| v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_hidden_before_first_update() {
        let tracker = VisibilityTracker::new(11, 11, 3);
        assert_eq!(tracker.state_at(Pos::new(5, 5)), RevealState::Hidden);
        assert_eq!(tracker.reveal_state_of(Pos::new(5, 5)), RevealState::Hidden);
        assert_eq!(tracker.visited_count(), 0);
    }

    #[test]
    fn visible_remembered_hidden() {
        let mut tracker = VisibilityTracker::new(12, 12, 3);
        tracker.update(Pos::new(5, 5));
        assert_eq!(tracker.state_at(Pos::new(5, 7)), RevealState::Visible);
        assert_eq!(tracker.state_at(Pos::new(5, 9)), RevealState::Hidden);

        tracker.update(Pos::new(5, 9));
        tracker.update(Pos::new(5, 2));
        assert_eq!(tracker.state_at(Pos::new(5, 9)), RevealState::Remembered);
        assert_eq!(tracker.reveal_state_of(Pos::new(5, 9)), RevealState::Remembered);
    }

    #[test]
    fn radius_is_euclidean() {
        let mut tracker = VisibilityTracker::new(12, 12, 3);
        tracker.update(Pos::new(5, 5));
        assert!(tracker.is_visited(Pos::new(7, 7)));
        assert!(!tracker.is_visited(Pos::new(8, 8)));
        assert_eq!(tracker.state_at(Pos::new(8, 8)), RevealState::Hidden);
    }

    #[test]
    fn visited_never_shrinks() {
        let mut tracker = VisibilityTracker::new(31, 23, 2);
        let path = [(1, 1), (5, 1), (9, 1), (9, 5), (20, 20), (1, 1), (29, 21)];
        let mut seen: Vec<Pos> = Vec::new();
        for (x, y) in path {
            tracker.update(Pos::new(x, y));
            for pos in &seen {
                assert!(tracker.is_visited(*pos));
            }
            seen = (0..23)
                .flat_map(|y| (0..31).map(move |x| Pos::new(x, y)))
                .filter(|p| tracker.is_visited(*p))
                .collect();
        }
    }

    #[test]
    fn update_counts_new_cells_and_clips_to_grid() {
        let mut tracker = VisibilityTracker::new(5, 5, 1);
        assert_eq!(tracker.update(Pos::new(0, 0)), 3);
        assert_eq!(tracker.update(Pos::new(0, 0)), 0);
        assert_eq!(tracker.update(Pos::new(1, 0)), 2);
    }

    #[test]
    fn point_maps_to_containing_cell() {
        let mut tracker = VisibilityTracker::new(10, 10, 1);
        tracker.update(Pos::new(1, 1));
        assert_eq!(
            tracker.reveal_state_of_point(Vec2::new(48.0, 48.0), 32.0),
            RevealState::Visible
        );
        assert_eq!(
            tracker.reveal_state_of_point(Vec2::new(150.0, 48.0), 32.0),
            RevealState::Hidden
        );
    }

    #[test]
    fn opacity_levels() {
        assert_eq!(RevealState::Visible.opacity(), 1.0);
        assert_eq!(RevealState::Remembered.opacity(), 0.5);
        assert_eq!(RevealState::Hidden.opacity(), 0.0);
    }
}
