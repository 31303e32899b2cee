//! Host-owned pixel memory the demo paints into.

use std::cell::{Cell, RefCell};

use offpaint_common::{Rect, ViewportSize, BYTES_PER_PIXEL};
use offpaint_host::{PaintDelegate, SurfaceRect};
use tracing::trace;

/// A `width × height` 32-bit backing store.
pub struct MemorySurface {
    size: Cell<ViewportSize>,
    pixels: RefCell<Vec<u8>>,
    paints: Cell<u64>,
}

impl MemorySurface {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            size: Cell::new(size),
            pixels: RefCell::new(vec![0; buffer_len(size)]),
            paints: Cell::new(0),
        }
    }

    pub fn size(&self) -> ViewportSize {
        self.size.get()
    }

    /// Number of `on_paint` calls so far.
    pub fn paints(&self) -> u64 {
        self.paints.get()
    }

    /// Reallocate for `size`, keeping the overlapping top-left region.
    pub fn resize(&self, size: ViewportSize) {
        let old = self.size.get();
        if old == size {
            return;
        }
        let mut next = vec![0; buffer_len(size)];
        {
            let pixels = self.pixels.borrow();
            let rows = old.height.min(size.height) as usize;
            let row_bytes = old.width.min(size.width) as usize * BYTES_PER_PIXEL;
            for y in 0..rows {
                let src = y * old.width as usize * BYTES_PER_PIXEL;
                let dst = y * size.width as usize * BYTES_PER_PIXEL;
                next[dst..dst + row_bytes].copy_from_slice(&pixels[src..src + row_bytes]);
            }
        }
        *self.pixels.borrow_mut() = next;
        self.size.set(size);
        trace!(from = %old, to = %size, "surface resized");
    }

    /// The pixel at `(x, y)`, or `None` outside the surface.
    #[cfg(test)]
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !contains(self.bounds(), x, y) {
            return None;
        }
        let offset = self.index(x, y);
        let pixels = self.pixels.borrow();
        let mut out = [0; 4];
        out.copy_from_slice(&pixels[offset..offset + BYTES_PER_PIXEL]);
        Some(out)
    }

    /// Order-sensitive digest of the surface contents.
    pub fn checksum(&self) -> u64 {
        self.pixels
            .borrow()
            .iter()
            .fold(0xcbf2_9ce4_8422_2325, |hash: u64, &b| {
                (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
            })
    }

    fn bounds(&self) -> Rect {
        let size = self.size.get();
        Rect::new(0, 0, edge(size.width), edge(size.height))
    }

    /// Byte offset of an in-bounds pixel.
    fn index(&self, x: i32, y: i32) -> usize {
        let width = self.size.get().width as usize;
        (y as usize * width + x as usize) * BYTES_PER_PIXEL
    }

    /// Move the pixels inside `clip` by `(dx, dy)`. Pixels that would come
    /// from outside the clip keep their old value.
    fn scroll(&self, clip: Rect, dx: i32, dy: i32) {
        let clip = clip.intersect(&self.bounds());
        let target = clip.intersect(&clip.offset(dx, dy));
        if target.is_empty() {
            return;
        }

        let len = target.width as usize * BYTES_PER_PIXEL;
        let rows = target.y..target.bottom();
        // Walk away from the direction of travel so no source row is
        // overwritten before it is read.
        let rows: Vec<i32> = if dy > 0 { rows.rev().collect() } else { rows.collect() };

        let mut pixels = self.pixels.borrow_mut();
        for y in rows {
            let src = self.index(target.x - dx, y - dy);
            let dst = self.index(target.x, y);
            pixels.copy_within(src..src + len, dst);
        }
    }

    /// Copy `pixels` (row stride `update.width × 4`) into `update`,
    /// clipped to the surface.
    fn blit(&self, pixels: &[u8], update: Rect) {
        let visible = update.intersect(&self.bounds());
        if visible.is_empty() {
            return;
        }

        let stride = update.width as usize * BYTES_PER_PIXEL;
        let len = visible.width as usize * BYTES_PER_PIXEL;
        let column = (visible.x - update.x) as usize * BYTES_PER_PIXEL;

        let mut surface = self.pixels.borrow_mut();
        for y in visible.y..visible.bottom() {
            let src = (y - update.y) as usize * stride + column;
            let Some(row) = pixels.get(src..src + len) else {
                break;
            };
            let dst = self.index(visible.x, y);
            surface[dst..dst + len].copy_from_slice(row);
        }
    }
}

impl PaintDelegate for MemorySurface {
    fn on_paint(&self, pixels: &[u8], update: SurfaceRect, dx: i32, dy: i32, clip: SurfaceRect) {
        if dx != 0 || dy != 0 {
            self.scroll(clip.into(), dx, dy);
        }
        self.blit(pixels, update.into());
        self.paints.set(self.paints.get() + 1);
        trace!(
            left = update.left,
            top = update.top,
            width = update.width,
            height = update.height,
            dx,
            dy,
            "surface painted"
        );
    }
}

fn buffer_len(size: ViewportSize) -> usize {
    size.width as usize * size.height as usize * BYTES_PER_PIXEL
}

fn edge(len: u32) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

#[cfg(test)]
fn contains(rect: Rect, x: i32, y: i32) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: i32, height: i32, value: u8) -> Vec<u8> {
        vec![value; (width * height) as usize * BYTES_PER_PIXEL]
    }

    fn surface(width: u32, height: u32) -> MemorySurface {
        MemorySurface::new(ViewportSize::new(width, height))
    }

    fn paint(s: &MemorySurface, rect: Rect, value: u8) {
        s.on_paint(
            &solid(rect.width, rect.height, value),
            rect.into(),
            0,
            0,
            SurfaceRect::default(),
        );
    }

    /// Fill row `y` with the value `y`.
    fn striped(width: u32, height: u32) -> MemorySurface {
        let s = surface(width, height);
        for y in 0..height as i32 {
            paint(&s, Rect::new(0, y, width as i32, 1), y as u8);
        }
        s
    }

    #[test]
    fn paint_lands_in_update_rect() {
        let s = surface(8, 8);
        paint(&s, Rect::new(2, 3, 2, 2), 7);
        assert_eq!(s.pixel(2, 3), Some([7; 4]));
        assert_eq!(s.pixel(3, 4), Some([7; 4]));
        assert_eq!(s.pixel(1, 3), Some([0; 4]));
        assert_eq!(s.pixel(4, 4), Some([0; 4]));
        assert_eq!(s.paints(), 1);
    }

    #[test]
    fn paint_uses_update_width_as_stride() {
        let s = surface(4, 4);
        let mut pixels = solid(2, 2, 1);
        // Second row of the 2x2 update.
        pixels[8..16].fill(9);
        s.on_paint(
            &pixels,
            Rect::new(1, 1, 2, 2).into(),
            0,
            0,
            SurfaceRect::default(),
        );
        assert_eq!(s.pixel(1, 1), Some([1; 4]));
        assert_eq!(s.pixel(2, 2), Some([9; 4]));
    }

    #[test]
    fn paint_is_clipped_to_surface() {
        let s = surface(4, 4);
        paint(&s, Rect::new(-2, 2, 4, 4), 5);
        assert_eq!(s.pixel(0, 2), Some([5; 4]));
        assert_eq!(s.pixel(1, 3), Some([5; 4]));
        assert_eq!(s.pixel(2, 2), Some([0; 4]));
        assert_eq!(s.pixel(0, 4), None);
    }

    #[test]
    fn scroll_up_moves_rows_within_clip() {
        let s = striped(4, 6);
        let full = Rect::new(0, 0, 4, 6);
        // Scroll up by two and paint the exposed strip.
        s.on_paint(&solid(4, 2, 200), Rect::new(0, 4, 4, 2).into(), 0, -2, full.into());
        assert_eq!(s.pixel(0, 0), Some([2; 4]));
        assert_eq!(s.pixel(3, 3), Some([5; 4]));
        assert_eq!(s.pixel(0, 4), Some([200; 4]));
        assert_eq!(s.pixel(0, 5), Some([200; 4]));
    }

    #[test]
    fn scroll_down_walks_rows_in_reverse() {
        let s = striped(2, 5);
        s.on_paint(&solid(2, 1, 99), Rect::new(0, 0, 2, 1).into(), 0, 1, Rect::new(0, 0, 2, 5).into());
        assert_eq!(s.pixel(0, 0), Some([99; 4]));
        assert_eq!(s.pixel(0, 1), Some([0; 4]));
        assert_eq!(s.pixel(0, 4), Some([3; 4]));
    }

    #[test]
    fn scroll_leaves_outside_of_clip_alone() {
        let s = striped(4, 6);
        let clip = Rect::new(0, 2, 4, 3);
        s.on_paint(&[], SurfaceRect::default(), 0, -1, clip.into());
        assert_eq!(s.pixel(0, 1), Some([1; 4]));
        assert_eq!(s.pixel(0, 2), Some([3; 4]));
        assert_eq!(s.pixel(0, 3), Some([4; 4]));
        // Would be filled from row 5, which is outside the clip.
        assert_eq!(s.pixel(0, 4), Some([4; 4]));
        assert_eq!(s.pixel(0, 5), Some([5; 4]));
    }

    #[test]
    fn horizontal_scroll() {
        let s = surface(4, 1);
        for x in 0..4 {
            paint(&s, Rect::new(x, 0, 1, 1), x as u8 + 1);
        }
        s.on_paint(&[], SurfaceRect::default(), 1, 0, Rect::new(0, 0, 4, 1).into());
        assert_eq!(s.pixel(0, 0), Some([1; 4]));
        assert_eq!(s.pixel(1, 0), Some([1; 4]));
        assert_eq!(s.pixel(3, 0), Some([3; 4]));
    }

    #[test]
    fn resize_keeps_top_left() {
        let s = striped(4, 4);
        s.resize(ViewportSize::new(6, 2));
        assert_eq!(s.size(), ViewportSize::new(6, 2));
        assert_eq!(s.pixel(3, 1), Some([1; 4]));
        assert_eq!(s.pixel(5, 1), Some([0; 4]));
        assert_eq!(s.pixel(0, 2), None);
    }

    #[test]
    fn checksum_tracks_content() {
        let a = surface(4, 4);
        let b = surface(4, 4);
        assert_eq!(a.checksum(), b.checksum());
        paint(&b, Rect::new(0, 0, 1, 1), 1);
        assert_ne!(a.checksum(), b.checksum());
    }
}
