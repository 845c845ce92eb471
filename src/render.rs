use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use labyrinth::{Cell as Tile, Level, Pos, RevealState};
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Wall,
    Floor,
    Coin,
    Fog,
}

impl Glyph {
    fn text(self) -> &'static str {
        match self {
            Glyph::Player => "😃",
            Glyph::Wall => "██",
            Glyph::Floor => "· ",
            Glyph::Coin => "● ",
            Glyph::Fog => "  ",
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const FOG: Cell = Cell {
    glyph: Glyph::Fog,
    color: Color::Reset,
};

/// Bright colour when fully revealed, dark variant when only remembered.
fn shade(state: RevealState, bright: Color, dark: Color) -> Color {
    if state.opacity() < 1.0 {
        dark
    } else {
        bright
    }
}

fn cell_for(level: &Level, pos: Pos) -> Cell {
    if pos == level.player_cell() {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    let state = level.tracker().state_at(pos);
    if state.opacity() == 0.0 {
        return FOG;
    }
    if level.collectibles().remaining().any(|item| item.cell == pos) {
        return Cell {
            glyph: Glyph::Coin,
            color: shade(state, Color::Yellow, Color::DarkYellow),
        };
    }
    match level.grid().get(pos) {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: shade(state, Color::Green, Color::DarkGreen),
        },
        Tile::Floor => Cell {
            glyph: Glyph::Floor,
            color: shade(state, Color::Grey, Color::DarkGrey),
        },
    }
}

/// Draws the maze centred in the terminal, redrawing only the cells that
/// changed since the previous frame.
pub struct Renderer {
    width: usize,
    height: usize,
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin: (u16, u16),
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            last: vec![FOG; width * height],
            last_hud: String::new(),
            needs_full: true,
            origin: (0, 1),
        }
    }

    /// Columns and rows the maze plus the HUD and win lines occupy.
    fn needed(&self) -> (u16, u16) {
        ((self.width * CELL_W) as u16, (self.height + 2) as u16)
    }

    /// Recentres for the current terminal size. `None` when it is too
    /// small to hold the maze.
    fn fit(&mut self) -> io::Result<Option<(u16, u16)>> {
        let (term_w, term_h) = terminal::size()?;
        let (needed_w, needed_h) = self.needed();
        if term_w < needed_w || term_h < needed_h {
            self.needs_full = true;
            return Ok(None);
        }
        let origin = ((term_w - needed_w) / 2, (term_h - needed_h) / 2 + 1);
        if origin != self.origin {
            self.origin = origin;
            self.needs_full = true;
        }
        Ok(Some(origin))
    }

    pub fn draw(&mut self, stdout: &mut Stdout, level: &Level) -> io::Result<()> {
        if self.fit()?.is_none() {
            let (term_w, term_h) = terminal::size()?;
            let (needed_w, needed_h) = self.needed();
            stdout.queue(MoveTo(0, 0))?;
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(Print(format!(
                "Terminal too small. Need at least {needed_w}x{needed_h} (cols x rows). \
                 Current: {term_w}x{term_h}."
            )))?;
            return stdout.flush();
        }

        let coins = level.collectibles();
        let hud = format!(
            "Coins: {}/{}  Seed: {:#x}  (WASD/arrows to move, q to quit)",
            coins.collected(),
            coins.target(),
            level.seed()
        );
        if self.needs_full || hud != self.last_hud {
            let (x, y) = self.origin;
            stdout.queue(MoveTo(x, y - 1))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Print(&hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud;
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let cell = cell_for(level, Pos { x, y });
                let idx = y * self.width + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(stdout, x, y, cell)?;
                }
            }
        }
        self.needs_full = false;
        stdout.flush()
    }

    fn draw_cell(&self, stdout: &mut Stdout, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = cell.glyph.text();
        let (ox, oy) = self.origin;
        stdout.queue(MoveTo(ox + (x * CELL_W) as u16, oy + y as u16))?;
        stdout.queue(SetForegroundColor(cell.color))?;
        stdout.queue(Print(text))?;
        for _ in UnicodeWidthStr::width(text)..CELL_W {
            stdout.queue(Print(' '))?;
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }

    /// Shows the win line under the maze and waits for `q`.
    pub fn draw_won(&mut self, stdout: &mut Stdout, level: &Level) -> io::Result<()> {
        let row = match self.fit()? {
            Some((x, y)) => MoveTo(x, y + self.height as u16),
            None => MoveTo(0, self.needed().1),
        };
        stdout.queue(row)?;
        stdout.queue(SetForegroundColor(Color::Yellow))?;
        stdout.queue(Print(format!(
            "YOU WIN - all {} coins found in {} frames (press q to quit)",
            level.collectibles().collected(),
            level.frame()
        )))?;
        stdout.queue(ResetColor)?;
        stdout.flush()?;
        loop {
            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth::{LevelConfig, MAZE_START};

    #[test]
    fn remembered_cells_are_dimmed() {
        assert!(shade(RevealState::Visible, Color::Green, Color::DarkGreen) == Color::Green);
        assert!(shade(RevealState::Remembered, Color::Green, Color::DarkGreen) == Color::DarkGreen);
    }

    #[test]
    fn far_cells_start_in_fog() {
        let level = Level::new(LevelConfig::default(), 3).unwrap();
        assert!(cell_for(&level, MAZE_START).glyph == Glyph::Player);
        assert!(cell_for(&level, Pos::new(29, 21)) == FOG);
        assert!(cell_for(&level, Pos::new(0, 0)).glyph == Glyph::Wall);
    }
}
