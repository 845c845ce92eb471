use crate::error::ConfigError;
use crate::maze::CarveStyle;

pub const DEFAULT_GRID_W: usize = 31;
pub const DEFAULT_GRID_H: usize = 23;
pub const CELL_SIZE: f32 = 32.0;
pub const PLAYER_SPEED: f32 = 4.0;
// Player sprite drawn at 90% of a cell.
pub const PLAYER_HALF_EXTENT: f32 = CELL_SIZE * 0.9 / 2.0;
pub const ITEM_SIZE: f32 = CELL_SIZE / 6.0;
pub const MAX_ITEMS: usize = 3;
pub const ITEMS_TO_WIN: usize = 3;

/// How far the player can see, in grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn visibility_radius(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Normal => 5,
            Difficulty::Hard => 1,
        }
    }
}

/// Everything fixed for one maze instance.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    pub style: CarveStyle,
    /// `Some` enables the loop pass with this per-wall chance.
    pub loop_chance: Option<f64>,
    pub visibility_radius: u32,
    pub cell_size: f32,
    pub player_speed: f32,
    pub player_half_extent: f32,
    pub item_size: f32,
    pub max_items: usize,
    pub items_to_win: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_W,
            height: DEFAULT_GRID_H,
            style: CarveStyle::Wide,
            loop_chance: None,
            visibility_radius: Difficulty::Easy.visibility_radius(),
            cell_size: CELL_SIZE,
            player_speed: PLAYER_SPEED,
            player_half_extent: PLAYER_HALF_EXTENT,
            item_size: ITEM_SIZE,
            max_items: MAX_ITEMS,
            items_to_win: ITEMS_TO_WIN,
        }
    }
}

impl LevelConfig {
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.visibility_radius = difficulty.visibility_radius();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.style.min_dimension();
        if self.width < min || self.height < min {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
                style: self.style,
                min,
            });
        }
        if let Some(chance) = self.loop_chance {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::LoopChanceOutOfRange { chance });
            }
        }
        for (field, value) in [
            ("cell size", self.cell_size),
            ("player speed", self.player_speed),
            ("player half extent", self.player_half_extent),
            ("item size", self.item_size),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.player_half_extent * 2.0 >= self.cell_size {
            return Err(ConfigError::PlayerTooLarge {
                half_extent: self.player_half_extent,
                cell_size: self.cell_size,
            });
        }
        if self.items_to_win == 0 {
            return Err(ConfigError::NothingToCollect);
        }
        Ok(())
    }
}
