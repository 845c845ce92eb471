//! Fog-of-war maze crawler core: maze generation, item placement,
//! visibility memory and collision-resolved movement.
//!
//! Everything here is plain data and synchronous computation; randomness is
//! always passed in through a seedable source.

pub mod config;
pub mod error;
pub mod grid;
pub mod items;
pub mod level;
pub mod maze;
pub mod movement;
pub mod visibility;

pub use config::{Difficulty, LevelConfig};
pub use error::ConfigError;
pub use grid::{Cell, Grid, Pos};
pub use items::{find_dead_ends, place_items, Collectibles, Collection, Item};
pub use level::{FrameReport, Level};
pub use maze::{generate, inject_loops, obstacles, CarveStyle, MAZE_START};
pub use movement::{step, InputVector, Mover, Rect, StepOutcome, Vec2};
pub use visibility::{RevealState, VisibilityTracker};
