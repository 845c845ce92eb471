use core::fmt;

use crate::maze::CarveStyle;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    GridTooSmall {
        width: usize,
        height: usize,
        style: CarveStyle,
        min: usize,
    },
    LoopChanceOutOfRange { chance: f64 },
    NonPositive { field: &'static str, value: f32 },
    PlayerTooLarge { half_extent: f32, cell_size: f32 },
    NothingToCollect,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooSmall {
                width,
                height,
                style,
                min,
            } => write!(
                f,
                "grid {width}x{height} too small for {style:?} mazes \
                 (need at least {min}x{min})"
            ),
            Self::LoopChanceOutOfRange { chance } => {
                write!(f, "loop chance {chance} outside 0.0..=1.0")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::PlayerTooLarge {
                half_extent,
                cell_size,
            } => write!(
                f,
                "player half extent {half_extent} does not fit a {cell_size} cell"
            ),
            Self::NothingToCollect => f.write_str("at least one item must be needed to win"),
        }
    }
}

impl std::error::Error for ConfigError {}
