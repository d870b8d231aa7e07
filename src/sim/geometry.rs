//! Overlap tests for axis-aligned boxes and the ball
//!
//! World space is y-up: a rect's `y` is its bottom edge. All intervals are
//! closed, so touching edges count as overlap. The world wraps horizontally,
//! which the `*_wrapped` variants handle by testing the target at its true
//! position and one screen-width to either side.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::positive_fmod;

/// Axis-aligned rectangle (bottom-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    /// Same rect moved horizontally
    #[inline]
    pub fn shifted_x(&self, x: f32) -> Self {
        Self { x, ..*self }
    }
}

/// True iff the two boxes overlap on both axes
#[inline]
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    let x = b.x <= a.right() && a.x <= b.right();
    let y = b.y <= a.top() && a.y <= b.top();
    x && y
}

/// True iff a circle overlaps a rect
///
/// After the bounding-square rejection the center sits in one of nine zones
/// around the rect:
///
/// ```text
///  top left    | top    | top right
/// -------------+--------+-------------
///  left        | rect   | right
/// -------------+--------+-------------
///  bottom left | bottom | bottom right
/// ```
///
/// The edge zones and the interior are hits outright. In a corner zone the
/// circle must contain the nearest rect corner.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let bounds = Rect::new(center.x - radius, center.y - radius, 2.0 * radius, 2.0 * radius);
    if !rect_overlap(&bounds, rect) {
        return false;
    }

    // Closed on both ends, matching `rect_overlap`: the left and right (bottom
    // and top) edges classify alike, so the test is mirror-symmetric.
    let in_column = rect.x <= center.x && center.x <= rect.right();
    let in_row = rect.y <= center.y && center.y <= rect.top();
    if in_column || in_row {
        return true;
    }

    let corner_x = if center.x < rect.x { rect.x } else { rect.right() };
    let corner_y = if center.y < rect.y { rect.y } else { rect.top() };
    let d = Vec2::new(corner_x, corner_y) - center;
    d.length_squared() < radius * radius
}

/// Run `overlaps(a_x, b_x)` with both x coordinates folded into the screen
/// and `b_x` additionally shifted one screen-width left and right.
#[inline]
pub fn wrap_aware(a_x: f32, b_x: f32, width: f32, mut overlaps: impl FnMut(f32, f32) -> bool) -> bool {
    let a = positive_fmod(a_x, width);
    let b = positive_fmod(b_x, width);
    [0.0, -width, width]
        .into_iter()
        .any(|shift| overlaps(a, b + shift))
}

/// Circle-rect overlap on a horizontally wrapping world
pub fn circle_rect_wrapped(center: Vec2, radius: f32, rect: &Rect, width: f32) -> bool {
    wrap_aware(center.x, rect.x, width, |cx, rx| {
        circle_rect_overlap(Vec2::new(cx, center.y), radius, &rect.shifted_x(rx))
    })
}

/// Rect-rect overlap on a horizontally wrapping world
pub fn rect_rect_wrapped(a: &Rect, b: &Rect, width: f32) -> bool {
    wrap_aware(a.x, b.x, width, |ax, bx| {
        rect_overlap(&a.shifted_x(ax), &b.shifted_x(bx))
    })
}
