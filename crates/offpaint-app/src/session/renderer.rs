//! A renderer that paints solid tiles and scroll strips into shared
//! bitmaps and answers every resize with a full repaint.

use std::collections::VecDeque;
use std::rc::Rc;

use offpaint_common::{BitmapId, Rect, RoutingId, ViewportSize, BYTES_PER_PIXEL};
use offpaint_host::{
    OutboundMessage, PaintFlags, PaintRectEvent, RawMessage, ScrollRectEvent, SubWindowMove,
};
use serde::Serialize;
use tracing::{debug, warn};

use super::process::SimulatedProcess;

/// Edge of the square repainted on non-scroll frames.
const TILE: i32 = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RendererStats {
    pub frames: u32,
    pub resizes: u32,
    pub scroll_acks: u32,
    pub paint_acks: u32,
}

pub struct SimulatedRenderer {
    routing_id: RoutingId,
    process: Rc<SimulatedProcess>,
    size: ViewportSize,
    scroll_step: u32,
    next_bitmap: u32,
    /// Bitmaps handed to the host, oldest first. Acks arrive in order.
    in_use: VecDeque<BitmapId>,
    stats: RendererStats,
}

impl SimulatedRenderer {
    pub fn new(routing_id: RoutingId, process: Rc<SimulatedProcess>, scroll_step: u32) -> Self {
        Self {
            routing_id,
            process,
            size: ViewportSize::EMPTY,
            scroll_step,
            next_bitmap: 1,
            in_use: VecDeque::new(),
            stats: RendererStats::default(),
        }
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn stats(&self) -> RendererStats {
        self.stats
    }

    /// Bitmaps the host has not acknowledged yet.
    pub fn outstanding(&self) -> usize {
        self.in_use.len()
    }

    /// React to one message from the host. A resize is answered with a
    /// full repaint that carries the resize ack.
    pub fn handle(&mut self, message: OutboundMessage) -> Result<Option<RawMessage>, serde_json::Error> {
        if message.routing_id() != self.routing_id {
            warn!(routing_id = %message.routing_id(), message = message.name(), "message for another route ignored");
            return Ok(None);
        }

        match message {
            OutboundMessage::ScrollAck { .. } => {
                self.stats.scroll_acks += 1;
                self.release_oldest();
                Ok(None)
            }
            OutboundMessage::PaintAck { .. } => {
                self.stats.paint_acks += 1;
                self.release_oldest();
                Ok(None)
            }
            OutboundMessage::Resize {
                new_size,
                reserved_area,
                ..
            } => {
                debug!(routing_id = %self.routing_id, from = %self.size, to = %new_size, ?reserved_area, "renderer resizing");
                self.size = new_size;
                self.stats.resizes += 1;

                let full = self.bounds();
                let event = PaintRectEvent {
                    bitmap: self.draw(full, [0x20, 0x20, 0x20, 0xFF]),
                    bitmap_rect: full,
                    view_size: self.size,
                    flags: PaintFlags::empty().with_resize_ack(),
                    sub_window_moves: Vec::new(),
                };
                RawMessage::paint_rect(&event).map(Some)
            }
        }
    }

    /// Produce frame `n`: odd frames scroll up by the scroll step and fill
    /// the exposed strip, even frames repaint one tile. Nothing is drawn
    /// before the first resize.
    pub fn frame(&mut self, n: u32) -> Result<Option<RawMessage>, serde_json::Error> {
        if self.size.is_empty() {
            return Ok(None);
        }
        self.stats.frames += 1;

        let full = self.bounds();
        let color = shade(n);

        if n % 2 == 1 && self.scroll_step > 0 {
            let step = i32::try_from(self.scroll_step)
                .unwrap_or(i32::MAX)
                .min(full.height);
            let strip = Rect::new(0, full.height - step, full.width, step);
            let event = ScrollRectEvent {
                bitmap: self.draw(strip, color),
                bitmap_rect: strip,
                clip_rect: full,
                dx: 0,
                dy: -step,
                view_size: self.size,
                sub_window_moves: Vec::new(),
            };
            return RawMessage::scroll_rect(&event).map(Some);
        }

        let side = TILE.min(full.width).min(full.height);
        let step = i32::try_from(n).unwrap_or(i32::MAX);
        let tile = Rect::new(
            step.wrapping_mul(37).rem_euclid(full.width - side + 1),
            step.wrapping_mul(23).rem_euclid(full.height - side + 1),
            side,
            side,
        );
        let event = PaintRectEvent {
            bitmap: self.draw(tile, color),
            bitmap_rect: tile,
            view_size: self.size,
            flags: PaintFlags::empty(),
            sub_window_moves: vec![SubWindowMove {
                window: u64::from(n),
                window_rect: tile,
                clip_rect: tile,
                visible: true,
            }],
        };
        RawMessage::paint_rect(&event).map(Some)
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            0,
            0,
            i32::try_from(self.size.width).unwrap_or(i32::MAX),
            i32::try_from(self.size.height).unwrap_or(i32::MAX),
        )
    }

    /// Fill a fresh shared bitmap covering `rect` with `color`.
    fn draw(&mut self, rect: Rect, color: [u8; 4]) -> BitmapId {
        let id = BitmapId(self.next_bitmap);
        self.next_bitmap = self.next_bitmap.wrapping_add(1);

        let pixels = rect.byte_len().unwrap_or(0) / BYTES_PER_PIXEL;
        let memory = color.repeat(pixels);
        self.process.publish_bitmap(id, memory);
        self.in_use.push_back(id);
        id
    }

    fn release_oldest(&mut self) {
        match self.in_use.pop_front() {
            Some(id) => {
                self.process.release_bitmap(id);
            }
            None => warn!(routing_id = %self.routing_id, "ack with no bitmap outstanding"),
        }
    }
}

fn shade(n: u32) -> [u8; 4] {
    [
        n.wrapping_mul(40) as u8,
        n.wrapping_mul(90) as u8,
        0xC0,
        0xFF,
    ]
}
