use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{terminal, ExecutableCommand};
use labyrinth::InputVector;

// Without release events a key counts as held this long after its last
// press or auto-repeat.
const INPUT_HOLD_MS: u64 = 160;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Dir {
    Up,
    Down,
    Left,
    Right,
}

fn idx_for_dir(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}

fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') => {
            Some(Dir::Down)
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') => {
            Some(Dir::Left)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') => {
            Some(Dir::Right)
        }
        _ => None,
    }
}

/// Asks the terminal for key release events. Returns whether it agreed.
pub fn enable_release_events(stdout: &mut Stdout) -> io::Result<bool> {
    if !terminal::supports_keyboard_enhancement()? {
        return Ok(false);
    }
    stdout.execute(PushKeyboardEnhancementFlags(
        KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
    ))?;
    Ok(true)
}

pub fn disable_release_events(stdout: &mut Stdout) -> io::Result<()> {
    stdout.execute(PopKeyboardEnhancementFlags)?;
    Ok(())
}

/// Tracks which direction keys are down.
pub struct HeldKeys {
    last_seen: [Option<Instant>; 4],
    releases: bool,
}

impl HeldKeys {
    pub fn new(releases: bool) -> Self {
        Self {
            last_seen: [None; 4],
            releases,
        }
    }

    /// Drains pending terminal events. Returns `true` when quit was asked.
    pub fn poll(&mut self) -> io::Result<bool> {
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                && key.kind == KeyEventKind::Press
            {
                return Ok(true);
            }
            let Some(dir) = dir_for_key(key.code) else {
                continue;
            };
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    self.last_seen[idx_for_dir(dir)] = Some(Instant::now());
                }
                KeyEventKind::Release => {
                    self.last_seen[idx_for_dir(dir)] = None;
                }
            }
        }
        Ok(false)
    }

    fn held(&self, dir: Dir, now: Instant) -> bool {
        match self.last_seen[idx_for_dir(dir)] {
            Some(_) if self.releases => true,
            Some(t) => now.duration_since(t) <= Duration::from_millis(INPUT_HOLD_MS),
            None => false,
        }
    }

    pub fn input(&self, now: Instant) -> InputVector {
        InputVector::from_keys(
            self.held(Dir::Left, now),
            self.held(Dir::Right, now),
            self.held(Dir::Up, now),
            self.held(Dir::Down, now),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_expire_without_release_events() {
        let mut keys = HeldKeys::new(false);
        let pressed = Instant::now();
        keys.last_seen[idx_for_dir(Dir::Right)] = Some(pressed);
        assert_eq!(keys.input(pressed), InputVector::new(1, 0));
        let later = pressed + Duration::from_millis(INPUT_HOLD_MS + 1);
        assert_eq!(keys.input(later), InputVector::IDLE);
    }

    #[test]
    fn keys_stay_held_until_released() {
        let mut keys = HeldKeys::new(true);
        let pressed = Instant::now();
        keys.last_seen[idx_for_dir(Dir::Up)] = Some(pressed);
        keys.last_seen[idx_for_dir(Dir::Left)] = Some(pressed);
        let later = pressed + Duration::from_secs(5);
        assert_eq!(keys.input(later), InputVector::new(-1, -1));
    }

    #[test]
    fn wasd_arrows_and_vi_keys_map_to_directions() {
        assert!(dir_for_key(KeyCode::Char('a')) == Some(Dir::Left));
        assert!(dir_for_key(KeyCode::Right) == Some(Dir::Right));
        assert!(dir_for_key(KeyCode::Char('j')) == Some(Dir::Down));
        assert!(dir_for_key(KeyCode::Char('x')).is_none());
    }
}
