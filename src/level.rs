//! One playable maze: generation at start, then a fixed per-frame order of
//! movement, fog update and item pick-up.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::LevelConfig;
use crate::error::ConfigError;
use crate::grid::{Grid, Pos};
use crate::items::{find_dead_ends, place_items, Collectibles, Collection, Item};
use crate::maze::{self, cell_center, MAZE_START};
use crate::movement::{self, InputVector, Mover, Rect, Vec2};
use crate::visibility::VisibilityTracker;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub moved: bool,
    pub pushbacks: usize,
    pub events: Vec<Collection>,
}

pub struct Level {
    config: LevelConfig,
    seed: u64,
    grid: Grid,
    obstacles: Vec<Rect>,
    tracker: VisibilityTracker,
    collectibles: Collectibles,
    player: Mover,
    player_cell: Pos,
    frame: u64,
}

impl Level {
    /// Validates `config`, then generates the maze and places items from
    /// `seed`. The same config and seed always produce the same level.
    pub fn new(config: LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut grid = maze::generate(config.width, config.height, config.style, &mut rng);
        if let Some(chance) = config.loop_chance {
            let opened = maze::inject_loops(&mut grid, config.style, chance, &mut rng);
            debug!("loop pass cut {opened} shortcuts");
        }
        let obstacles = maze::obstacles(&grid, config.cell_size);

        let placed = place_items(&grid, MAZE_START, config.max_items);
        info!(
            "generated {}x{} {:?} maze (seed {seed:#x}): {} floor cells, {} dead ends, {} items",
            config.width,
            config.height,
            config.style,
            grid.floor_cells().len(),
            find_dead_ends(&grid).len(),
            placed.len()
        );
        if placed.len() < config.items_to_win {
            warn!(
                "only {} of {} items could be placed; the level cannot be won",
                placed.len(),
                config.items_to_win
            );
        }
        let items = placed
            .into_iter()
            .map(|cell| Item::new(cell, config.cell_size, config.item_size))
            .collect();
        let collectibles = Collectibles::new(items, config.items_to_win);

        let player = Mover::new(
            cell_center(MAZE_START, config.cell_size),
            config.player_speed,
            config.player_half_extent,
        );
        let mut tracker =
            VisibilityTracker::new(config.width, config.height, config.visibility_radius);
        tracker.update(MAZE_START);

        Ok(Self {
            config,
            seed,
            grid,
            obstacles,
            tracker,
            collectibles,
            player,
            player_cell: MAZE_START,
            frame: 0,
        })
    }

    /// One nominal frame.
    pub fn tick(&mut self, input: InputVector) -> FrameReport {
        self.advance(input, 1.0)
    }

    /// Moves the player, refreshes the fog if the player's cell changed,
    /// then picks up any revealed item the player touches.
    pub fn advance(&mut self, input: InputVector, dt: f32) -> FrameReport {
        self.frame += 1;
        let outcome = movement::step(&mut self.player, input, &self.obstacles, dt);

        if outcome.moved {
            let cell = self.cell_of(outcome.position);
            if cell != self.player_cell {
                self.player_cell = cell;
                self.tracker.update(cell);
            }
        }

        let events = self
            .collectibles
            .collect_touching(&self.player.bounds(), &self.tracker);
        if events
            .iter()
            .any(|e| matches!(e, Collection::AllCollected { .. }))
        {
            info!("all items collected after {} frames", self.frame);
        }

        FrameReport {
            moved: outcome.moved,
            pushbacks: outcome.pushbacks,
            events,
        }
    }

    fn cell_of(&self, position: Vec2) -> Pos {
        let size = self.config.cell_size;
        let x = (position.x / size).floor().max(0.0) as usize;
        let y = (position.y / size).floor().max(0.0) as usize;
        Pos {
            x: x.min(self.grid.width() - 1),
            y: y.min(self.grid.height() - 1),
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn tracker(&self) -> &VisibilityTracker {
        &self.tracker
    }

    pub fn collectibles(&self) -> &Collectibles {
        &self.collectibles
    }

    pub fn player(&self) -> &Mover {
        &self.player
    }

    pub fn player_cell(&self) -> Pos {
        self.player_cell
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_won(&self) -> bool {
        self.collectibles.is_complete()
    }
}
