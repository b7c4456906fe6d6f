//! Integer rectangles in canvas pixel space.

/// A rectangle with a signed origin; width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Shrink by `margin` on every side, clamping at zero size.
    pub fn inset(self, margin: u32) -> Self {
        let shift = i32::try_from(margin).unwrap_or(i32::MAX);
        Self {
            x: self.x.saturating_add(shift),
            y: self.y.saturating_add(shift),
            width: self.width.saturating_sub(margin.saturating_mul(2)),
            height: self.height.saturating_sub(margin.saturating_mul(2)),
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        let (px, py) = (px as i64, py as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        px >= x && py >= y && px < x + self.width as i64 && py < y + self.height as i64
    }
}
