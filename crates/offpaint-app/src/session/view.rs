use std::cell::Cell;

use offpaint_common::{Rect, ViewportSize};
use offpaint_host::{HostView, SubWindowMove};
use tracing::{debug, trace};

/// Window-side view whose size the session changes over time.
pub struct DemoView {
    bounds: Cell<Rect>,
    reserved_area: Option<Rect>,
    scrolls: Cell<u64>,
    repaints: Cell<u64>,
}

impl DemoView {
    pub fn new(size: ViewportSize, reserved_area: Rect) -> Self {
        Self {
            bounds: Cell::new(bounds_for(size)),
            reserved_area: (!reserved_area.is_empty()).then_some(reserved_area),
            scrolls: Cell::new(0),
            repaints: Cell::new(0),
        }
    }

    pub fn size(&self) -> ViewportSize {
        self.bounds.get().size()
    }

    pub fn set_size(&self, size: ViewportSize) {
        self.bounds.set(bounds_for(size));
    }

    pub fn scrolls(&self) -> u64 {
        self.scrolls.get()
    }

    pub fn repaints(&self) -> u64 {
        self.repaints.get()
    }
}

impl HostView for DemoView {
    fn viewport_bounds(&self) -> Rect {
        self.bounds.get()
    }

    fn did_scroll_region(&self, clip: Rect, dx: i32, dy: i32) {
        self.scrolls.set(self.scrolls.get() + 1);
        debug!(?clip, dx, dy, "view scrolled");
    }

    fn did_paint_region(&self, rect: Rect) {
        self.repaints.set(self.repaints.get() + 1);
        debug!(?rect, "view repainted");
    }

    fn move_sub_windows(&self, moves: &[SubWindowMove]) {
        for m in moves {
            trace!(window = m.window, visible = m.visible, rect = ?m.window_rect, "sub-window moved");
        }
    }

    fn reserved_area(&self) -> Option<Rect> {
        self.reserved_area
    }
}

fn bounds_for(size: ViewportSize) -> Rect {
    Rect::new(
        0,
        0,
        i32::try_from(size.width).unwrap_or(i32::MAX),
        i32::try_from(size.height).unwrap_or(i32::MAX),
    )
}
