//! Continuous-space movement of the controlled entity against static
//! rectangular obstacles.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle described by its centre and half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub const fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    pub fn square(center: Vec2, half_extent: f32) -> Self {
        Self::new(center, Vec2::new(half_extent, half_extent))
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    /// Strict overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Per-frame directional input, each axis in `-1..=1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputVector {
    pub x: i8,
    pub y: i8,
}

impl InputVector {
    pub const IDLE: InputVector = InputVector { x: 0, y: 0 };

    pub fn new(x: i8, y: i8) -> Self {
        Self {
            x: x.clamp(-1, 1),
            y: y.clamp(-1, 1),
        }
    }

    /// Opposite keys held together cancel on that axis.
    pub fn from_keys(left: bool, right: bool, up: bool, down: bool) -> Self {
        Self {
            x: right as i8 - left as i8,
            y: down as i8 - up as i8,
        }
    }

    pub fn is_idle(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// The single controlled entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mover {
    pub position: Vec2,
    /// World units per nominal frame.
    pub speed: f32,
    pub half_extent: f32,
}

impl Mover {
    pub fn new(position: Vec2, speed: f32, half_extent: f32) -> Self {
        Self {
            position,
            speed,
            half_extent,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::square(self.position, self.half_extent)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub position: Vec2,
    /// Any input axis was non-zero, whether or not the entity ended up
    /// somewhere else.
    pub moved: bool,
    pub pushbacks: usize,
}

/// Advances `entity` by its input and undoes the displacement once for
/// every obstacle it still overlaps, visiting obstacles in order.
///
/// Diagonal input is not normalised, and a correction is a full
/// `speed * dt` on each pressed axis. `dt` is in nominal frames, so
/// `1.0` is one frame of movement.
pub fn step(entity: &mut Mover, input: InputVector, obstacles: &[Rect], dt: f32) -> StepOutcome {
    let delta = entity.speed * dt;
    let dx = f32::from(input.x) * delta;
    let dy = f32::from(input.y) * delta;

    entity.position.x += dx;
    entity.position.y += dy;

    let mut pushbacks = 0;
    for obstacle in obstacles {
        if entity.bounds().overlaps(obstacle) {
            entity.position.x -= dx;
            entity.position.y -= dy;
            pushbacks += 1;
        }
    }

    StepOutcome {
        position: entity.position,
        moved: !input.is_idle(),
        pushbacks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(x: f32, y: f32) -> Rect {
        Rect::square(Vec2::new(x, y), 16.0)
    }

    #[test]
    fn pushed_back_when_walking_into_wall() {
        let mut entity = Mover::new(Vec2::new(48.0, 48.0), 4.0, 16.0);
        let out = step(&mut entity, InputVector::new(-1, 0), &[wall(32.0, 32.0)], 1.0);
        assert_eq!(out.position.x, 48.0);
        assert_eq!(out.position.y, 48.0);
        assert!(out.moved);
        assert_eq!(out.pushbacks, 1);
    }

    #[test]
    fn free_movement_is_not_normalised() {
        let mut entity = Mover::new(Vec2::new(100.0, 100.0), 4.0, 14.4);
        let out = step(&mut entity, InputVector::new(1, 1), &[], 1.0);
        assert_eq!(out.position, Vec2::new(104.0, 104.0));
        assert_eq!(out.pushbacks, 0);
    }

    #[test]
    fn idle_input_reports_not_moved() {
        let mut entity = Mover::new(Vec2::new(10.0, 10.0), 4.0, 2.0);
        let out = step(&mut entity, InputVector::IDLE, &[], 1.0);
        assert!(!out.moved);
        assert_eq!(out.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let input = InputVector::from_keys(true, true, false, true);
        assert_eq!(input, InputVector { x: 0, y: 1 });
        let mut entity = Mover::new(Vec2::new(10.0, 10.0), 4.0, 2.0);
        let out = step(&mut entity, input, &[], 1.0);
        assert_eq!(out.position, Vec2::new(10.0, 14.0));
    }

    #[test]
    fn pushback_fires_per_overlapping_obstacle() {
        // Two stacked walls both overlap after the first correction, so the
        // entity is pushed back twice.
        let mut entity = Mover::new(Vec2::new(48.0, 48.0), 4.0, 16.0);
        let walls = [wall(32.0, 32.0), wall(32.0, 64.0)];
        let out = step(&mut entity, InputVector::new(-1, 0), &walls, 1.0);
        assert_eq!(out.pushbacks, 2);
        assert_eq!(out.position.x, 52.0);
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let mut entity = Mover::new(Vec2::new(64.0, 48.0), 4.0, 16.0);
        let out = step(&mut entity, InputVector::new(0, 1), &[wall(32.0, 48.0)], 1.0);
        assert_eq!(out.pushbacks, 0);
        assert_eq!(out.position, Vec2::new(64.0, 52.0));
    }

    #[test]
    fn dt_scales_displacement() {
        let mut entity = Mover::new(Vec2::new(0.0, 0.0), 4.0, 1.0);
        let out = step(&mut entity, InputVector::new(1, 0), &[], 2.5);
        assert_eq!(out.position.x, 10.0);
    }
}
