//! Recording collaborators for unit tests.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use offpaint_common::{BitmapId, MessageKind, Rect, RoutingId};

use crate::host::{HostOptions, RenderHost};
use crate::messages::{OutboundMessage, SubWindowMove};
use crate::transport::{RenderProcessHost, SharedBitmap};
use crate::view::{HostView, PaintDelegate, SurfaceRect};

/// Every collaborator call, in the order the host made them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Sent(OutboundMessage),
    BadMessage(MessageKind),
    Paint {
        len: usize,
        update: SurfaceRect,
        dx: i32,
        dy: i32,
        clip: SurfaceRect,
    },
    MoveSubWindows(usize),
    DidScroll { clip: Rect, dx: i32, dy: i32 },
    DidPaint(Rect),
}

#[derive(Default)]
pub struct Journal {
    calls: RefCell<Vec<Call>>,
}

impl Journal {
    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Sent(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn bad_messages(&self) -> Vec<MessageKind> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::BadMessage(k) => Some(*k),
                _ => None,
            })
            .collect()
    }

    pub fn paints(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Paint { .. }))
            .count()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.borrow().iter().position(pred)
    }
}

pub struct FakeProcess {
    journal: Rc<Journal>,
    pub connected: Cell<bool>,
    pub send_ok: Cell<bool>,
    bitmaps: RefCell<HashMap<BitmapId, Vec<u8>>>,
}

impl FakeProcess {
    pub fn add_bitmap(&self, id: BitmapId, size: usize) {
        self.bitmaps.borrow_mut().insert(id, vec![0xAB; size]);
    }
}

impl RenderProcessHost for FakeProcess {
    fn has_connection(&self) -> bool {
        self.connected.get()
    }

    fn shared_bitmap(&self, id: BitmapId) -> Option<SharedBitmap<'_>> {
        Ref::filter_map(self.bitmaps.borrow(), |m| m.get(&id).map(Vec::as_slice))
            .ok()
            .map(|memory| SharedBitmap::new(id, memory))
    }

    fn received_bad_message(&self, kind: MessageKind) {
        self.journal.push(Call::BadMessage(kind));
    }

    fn send(&self, message: OutboundMessage) -> bool {
        if !self.send_ok.get() {
            return false;
        }
        self.journal.push(Call::Sent(message));
        true
    }
}

pub struct FakeDelegate {
    journal: Rc<Journal>,
}

impl PaintDelegate for FakeDelegate {
    fn on_paint(&self, pixels: &[u8], update: SurfaceRect, dx: i32, dy: i32, clip: SurfaceRect) {
        self.journal.push(Call::Paint {
            len: pixels.len(),
            update,
            dx,
            dy,
            clip,
        });
    }
}

pub struct FakeView {
    journal: Rc<Journal>,
    pub bounds: Cell<Rect>,
    pub reserved: Cell<Option<Rect>>,
}

impl HostView for FakeView {
    fn viewport_bounds(&self) -> Rect {
        self.bounds.get()
    }

    fn did_scroll_region(&self, clip: Rect, dx: i32, dy: i32) {
        self.journal.push(Call::DidScroll { clip, dx, dy });
    }

    fn did_paint_region(&self, rect: Rect) {
        self.journal.push(Call::DidPaint(rect));
    }

    fn move_sub_windows(&self, moves: &[SubWindowMove]) {
        self.journal.push(Call::MoveSubWindows(moves.len()));
    }

    fn reserved_area(&self) -> Option<Rect> {
        self.reserved.get()
    }
}

/// A connected process, a live view, and a delegate sharing one journal.
pub struct Harness {
    pub journal: Rc<Journal>,
    pub process: Rc<FakeProcess>,
    pub delegate: Rc<FakeDelegate>,
    pub view: Rc<FakeView>,
}

impl Harness {
    pub fn new() -> Self {
        let journal = Rc::new(Journal::default());
        Self {
            process: Rc::new(FakeProcess {
                journal: Rc::clone(&journal),
                connected: Cell::new(true),
                send_ok: Cell::new(true),
                bitmaps: RefCell::new(HashMap::new()),
            }),
            delegate: Rc::new(FakeDelegate {
                journal: Rc::clone(&journal),
            }),
            view: Rc::new(FakeView {
                journal: Rc::clone(&journal),
                bounds: Cell::new(Rect::default()),
                reserved: Cell::new(None),
            }),
            journal,
        }
    }

    /// The view as the host holds it.
    pub fn weak_view(&self) -> Weak<dyn HostView> {
        let view: Rc<dyn HostView> = self.view.clone();
        Rc::downgrade(&view)
    }

    pub fn set_desired(&self, width: i32, height: i32) {
        self.view.bounds.set(Rect::new(0, 0, width, height));
    }

    /// An initialized view host wired to this harness.
    pub fn host(&self, routing_id: i32) -> RenderHost {
        self.host_with(routing_id, HostOptions::default())
    }

    pub fn host_with(&self, routing_id: i32, options: HostOptions) -> RenderHost {
        let mut host = RenderHost::new_view(
            offpaint_common::SiteId::new(),
            self.process.clone(),
            self.delegate.clone(),
            RoutingId(routing_id),
            options,
        );
        host.set_view(self.weak_view());
        host.set_renderer_initialized(true);
        host
    }
}
