//! Cell-space rectangles
//!
//! Every rectangle in the engine is expressed as two corner points in terminal
//! cell units: `(x0, y0)` inclusive, `(x1, y1)` exclusive. A rectangle with zero
//! width or height is still a valid value; it means "nothing to draw here".

use ratatui::layout::Rect;
use serde::Serialize;

/// Rectangle in terminal cells, corners `(x0, y0)`..`(x1, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Dimensions {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Dimensions {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle anchored at the origin covering `width` x `height` cells
    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// Cell count; degenerate rectangles have no area
    pub fn area(&self) -> i64 {
        if self.is_degenerate() {
            0
        } else {
            i64::from(self.width()) * i64::from(self.height())
        }
    }

    /// True when there is no room to create a surface
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Extent along the main axis of a box laid out in `direction`
    pub(crate) fn extent(&self, direction: super::Direction) -> i32 {
        match direction {
            super::Direction::Row => self.height(),
            super::Direction::Column => self.width(),
        }
    }

    /// A `width` x `height` rectangle centered inside `self`, clamped to fit
    pub fn centered(&self, width: i32, height: i32) -> Self {
        let width = width.clamp(0, self.width().max(0));
        let height = height.clamp(0, self.height().max(0));
        let x0 = self.x0 + (self.width() - width) / 2;
        let y0 = self.y0 + (self.height() - height) / 2;
        Self::new(x0, y0, x0 + width, y0 + height)
    }

    /// Whether two rectangles share at least one cell
    pub fn overlaps(&self, other: &Dimensions) -> bool {
        !self.is_degenerate()
            && !other.is_degenerate()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// Convert to a ratatui `Rect`, clipping negative coordinates to zero
    pub fn to_rect(&self) -> Rect {
        let clamp = |v: i32| v.clamp(0, i32::from(u16::MAX)) as u16;
        let x = clamp(self.x0);
        let y = clamp(self.y0);
        Rect::new(
            x,
            y,
            clamp(self.x1).saturating_sub(x),
            clamp(self.y1).saturating_sub(y),
        )
    }
}

impl From<Rect> for Dimensions {
    fn from(rect: Rect) -> Self {
        Self::new(
            i32::from(rect.x),
            i32::from(rect.y),
            i32::from(rect.x) + i32::from(rect.width),
            i32::from(rect.y) + i32::from(rect.height),
        )
    }
}
