//! The windowing side: the view that displays the backing store and the
//! delegate that owns it.

use offpaint_common::Rect;

use crate::messages::SubWindowMove;

/// Rectangle in the backing store's coordinate convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SurfaceRect {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
}

impl SurfaceRect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl From<Rect> for SurfaceRect {
    fn from(rect: Rect) -> Self {
        Self {
            top: rect.y,
            left: rect.x,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl From<SurfaceRect> for Rect {
    fn from(rect: SurfaceRect) -> Self {
        Rect::new(rect.left, rect.top, rect.width, rect.height)
    }
}

/// Owner of the backing store. Receives every pixel delta.
pub trait PaintDelegate {
    /// Shift the pixels inside `clip` by `(dx, dy)`, then copy `pixels`
    /// (32-bit, rows of `update.width`) into `update`.
    ///
    /// Plain paints pass `dx = dy = 0` and an empty `clip`.
    fn on_paint(&self, pixels: &[u8], update: SurfaceRect, dx: i32, dy: i32, clip: SurfaceRect);
}

/// The view showing a host's content. May be torn down at any time, so
/// hosts keep only a weak reference.
pub trait HostView {
    /// Where the view currently wants to be; its size is the desired
    /// viewport size.
    fn viewport_bounds(&self) -> Rect;

    fn did_scroll_region(&self, clip: Rect, dx: i32, dy: i32);

    fn did_paint_region(&self, rect: Rect);

    fn move_sub_windows(&self, moves: &[SubWindowMove]);

    /// Platform area the renderer must keep clear, if the view has one.
    fn reserved_area(&self) -> Option<Rect> {
        None
    }
}
