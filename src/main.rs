mod input;
mod render;

use std::fs::File;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use labyrinth::config::{DEFAULT_GRID_H, DEFAULT_GRID_W};
use labyrinth::maze::DEFAULT_LOOP_CHANCE;
use labyrinth::{CarveStyle, Collection, Difficulty, Level, LevelConfig};
use log::info;

use input::HeldKeys;
use render::Renderer;

const DEFAULT_FPS: u64 = 60;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleArg {
    Classic,
    Wide,
    Broad,
}

impl From<StyleArg> for CarveStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Classic => CarveStyle::Classic,
            StyleArg::Wide => CarveStyle::Wide,
            StyleArg::Broad => CarveStyle::Broad,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

/// Navigate a dark labyrinth and find every coin. You only see what is
/// directly around you.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells
    #[arg(long, default_value_t = DEFAULT_GRID_W)]
    width: usize,

    /// Maze height in cells
    #[arg(long, default_value_t = DEFAULT_GRID_H)]
    height: usize,

    /// Size of the opening room and spacing between passages
    #[arg(long, value_enum, default_value_t = StyleArg::Wide)]
    style: StyleArg,

    /// Open some walls between parallel corridors to create loops
    #[arg(long)]
    loops: bool,

    /// Chance per eligible wall for the loop pass (implies --loops)
    #[arg(long)]
    loop_chance: Option<f64>,

    /// Sight radius preset
    #[arg(long, value_enum, default_value_t = DifficultyArg::Easy)]
    difficulty: DifficultyArg,

    /// Sight radius in cells, overriding --difficulty
    #[arg(long)]
    radius: Option<u32>,

    /// Random seed; a fresh one is drawn when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second (falls back to LABYRINTH_FPS)
    #[arg(long)]
    fps: Option<u64>,

    /// Where log output goes while the terminal is in use
    #[arg(long, default_value = "labyrinth.log")]
    log_file: PathBuf,
}

impl Args {
    fn level_config(&self) -> LevelConfig {
        let mut config = LevelConfig {
            width: self.width,
            height: self.height,
            style: self.style.into(),
            loop_chance: self
                .loop_chance
                .or(self.loops.then_some(DEFAULT_LOOP_CHANCE)),
            ..LevelConfig::default()
        }
        .with_difficulty(self.difficulty.into());
        if let Some(radius) = self.radius {
            config.visibility_radius = radius;
        }
        config
    }
}

fn read_fps(arg: Option<u64>) -> u64 {
    arg.or_else(|| {
        std::env::var("LABYRINTH_FPS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
    })
    .filter(|v| *v > 0)
    .unwrap_or(DEFAULT_FPS)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = args.level_config();
    info!("starting with seed {seed:#x}: {config:?}");
    let level = Level::new(config, seed).context("invalid maze configuration")?;
    let fps = read_fps(args.fps);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("failed enabling raw mode")?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;
    let releases = input::enable_release_events(&mut stdout).unwrap_or(false);

    let result = run(&mut stdout, level, fps, releases);

    if releases {
        input::disable_release_events(&mut stdout)?;
    }
    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, mut level: Level, fps: u64, releases: bool) -> Result<()> {
    let grid = level.grid();
    let mut renderer = Renderer::new(grid.width(), grid.height());
    let mut keys = HeldKeys::new(releases);
    let frame_time = Duration::from_micros(1_000_000 / fps.max(1));

    renderer.draw(stdout, &level)?;
    loop {
        let frame_start = Instant::now();
        if keys.poll()? {
            info!("quit after {} frames", level.frame());
            return Ok(());
        }

        let report = level.tick(keys.input(frame_start));
        renderer.draw(stdout, &level)?;
        if report
            .events
            .iter()
            .any(|e| matches!(e, Collection::AllCollected { .. }))
        {
            renderer.draw_won(stdout, &level)?;
            return Ok(());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
