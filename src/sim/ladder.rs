//! Brick arena and procedural brick-ladder generation
//!
//! Bricks live in a fixed-capacity arena. A slot's index is its permanent
//! identity: slots are never appended or removed, only emptied when the
//! brick breaks.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::{LANDING_SIZE, MAX_BRICKS};
use crate::tuning::Tuning;

/// A live brick (bottom-left corner in world space)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
}

impl Brick {
    pub fn rect(&self, tuning: &Tuning) -> Rect {
        Rect::new(self.x, self.y, tuning.brick_width, tuning.brick_height)
    }

    /// World y of the standing surface
    pub fn top(&self, tuning: &Tuning) -> f32 {
        self.y + tuning.brick_height
    }
}

/// Fixed-capacity, index-stable brick storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickField {
    slots: Vec<Option<Brick>>,
}

impl Default for BrickField {
    fn default() -> Self {
        Self::empty()
    }
}

impl BrickField {
    /// All slots empty
    pub fn empty() -> Self {
        Self {
            slots: vec![None; MAX_BRICKS],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&Brick> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Place a brick in a slot, replacing whatever was there
    pub fn set(&mut self, index: usize, brick: Brick) {
        assert!(index < self.slots.len(), "brick slot {index} out of range");
        self.slots[index] = Some(brick);
    }

    /// Empty a live slot, returning the brick that was there.
    ///
    /// Breaking an empty slot is a logic error.
    pub fn break_brick(&mut self, index: usize) -> Brick {
        match self.slots.get_mut(index).and_then(Option::take) {
            Some(brick) => brick,
            None => panic!("brick slot {index} broken while empty"),
        }
    }

    /// Live bricks with their slot index, in slot order
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &Brick)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|b| (i, b)))
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Three side-by-side bricks centered on `center`, starting at `first`
    fn place_landing(&mut self, first: usize, center: Vec2, brick_width: f32) {
        let xs = [
            center.x - brick_width / 2.0,
            center.x - brick_width * 3.0 / 2.0,
            center.x + brick_width / 2.0,
        ];
        for (offset, x) in xs.into_iter().enumerate() {
            self.set(first + offset, Brick { x, y: center.y });
        }
    }
}

/// Which side of the previous landing the next one goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Build the ascending brick ladder for a level.
///
/// The origin landing sits at `start`. The next three landings are placed at
/// fixed offset bands from the start x (right, far left, far right) so the
/// opening climb is always reachable. Every later landing picks a side at
/// random and lands 3 to 6 brick-widths from the previous landing center,
/// 1.5 to 2 player-heights higher. Landings are added until the arena has no
/// room for another group of three.
pub fn generate_ladder(rng: &mut impl Rng, start: Vec2, tuning: &Tuning) -> BrickField {
    let mut field = BrickField::empty();
    let bw = tuning.brick_width;
    let ph = tuning.player_height;

    field.place_landing(0, start, bw);

    let opening = [(3.0, 6.0), (-9.0, -6.0), (6.0, 9.0)];
    let mut last = start;
    let mut index = LANDING_SIZE;

    while index + LANDING_SIZE <= field.capacity() {
        let landing = (index / LANDING_SIZE) - 1;
        let x = match opening.get(landing) {
            Some(&(lo, hi)) => rng.random_range(start.x + lo * bw..=start.x + hi * bw),
            None => {
                let side = if rng.random_bool(0.5) { Side::Right } else { Side::Left };
                let dx = rng.random_range(3.0 * bw..=6.0 * bw);
                match side {
                    Side::Right => last.x + dx,
                    Side::Left => last.x - dx,
                }
            }
        };
        let y = last.y + rng.random_range(1.5 * ph..=2.0 * ph);

        last = Vec2::new(x, y);
        field.place_landing(index, last, bw);
        index += LANDING_SIZE;
    }

    log::debug!(
        "Generated {} landings from ({:.1}, {:.1}), top at y={:.1}",
        index / LANDING_SIZE,
        start.x,
        start.y,
        last.y
    );

    field
}
