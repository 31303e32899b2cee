//! Session struct, construction, and the frame loop.

use std::rc::Rc;

use offpaint_common::{EventBus, OffpaintError, RoutingId, SiteId, ViewportSize};
use offpaint_config::schema::{DemoConfig, HostConfig, OffpaintConfig};
use offpaint_config::validation::MAX_VIEWPORT_EDGE;
use offpaint_host::{
    ApplyReport, BitmapDisposition, DispatchResult, FactoryRegistration, FactoryRegistry,
    HostContext, HostOptions, HostRegistry, HostView, MemoryHostFactory, PaintTransportSink,
    RawMessage, RenderHost,
};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::surface::MemorySurface;

use super::process::SimulatedProcess;
use super::renderer::{RendererStats, SimulatedRenderer};
use super::view::DemoView;

const ROUTING_ID: RoutingId = RoutingId(1);

/// How much the view grows each time it is resized.
const GROW_BY: (u32, u32) = (64, 48);

/// Host-side tallies of what the renderer sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryStats {
    pub applied: u32,
    pub missing: u32,
    pub undersized: u32,
    pub violations: u32,
    pub decode_failures: u32,
    pub resizes_requested: u32,
}

impl DeliveryStats {
    fn record(&mut self, report: &ApplyReport) {
        match report.bitmap {
            BitmapDisposition::Applied => self.applied += 1,
            BitmapDisposition::Missing => self.missing += 1,
            BitmapDisposition::Undersized { .. } => self.undersized += 1,
        }
        if report.chained_resize.is_some_and(|outcome| outcome.is_sent()) {
            self.resizes_requested += 1;
        }
    }
}

/// End-of-run report, logged as JSON by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub frames: u32,
    pub view_size: ViewportSize,
    pub host_size: ViewportSize,
    pub delivery: DeliveryStats,
    pub renderer: RendererStats,
    pub renderer_size: ViewportSize,
    pub surface_size: ViewportSize,
    pub bad_messages: usize,
    pub outstanding_bitmaps: usize,
    pub live_bitmaps: usize,
    pub surface_paints: u64,
    pub view_scrolls: u64,
    pub view_repaints: u64,
    pub surface_checksum: u64,
}

pub struct Session {
    pub(super) demo: DemoConfig,
    pub(super) registration: Option<FactoryRegistration>,
    pub(super) hosts: HostRegistry,
    pub(super) process: Rc<SimulatedProcess>,
    pub(super) surface: Rc<MemorySurface>,
    pub(super) view: Rc<DemoView>,
    pub(super) renderer: SimulatedRenderer,
    pub(super) delivery: DeliveryStats,
}

/// Host options as configured.
pub fn host_options(config: &HostConfig) -> HostOptions {
    HostOptions {
        reserved_area: config.reserved_area,
        await_initial_resize_ack: config.await_initial_resize_ack,
    }
}

impl Session {
    /// Register the host factory and create the one view host this session
    /// drives.
    pub fn new(config: &OffpaintConfig, events: Rc<EventBus>) -> Result<Self, OffpaintError> {
        let options = host_options(&config.host);
        let factories = FactoryRegistry::new(Rc::clone(&events));
        let registration = MemoryHostFactory::register(&factories, options.clone())?;
        let mut hosts = HostRegistry::new(factories, events).with_widget_options(options);

        let size = ViewportSize::new(config.demo.initial_width, config.demo.initial_height);
        let process = Rc::new(SimulatedProcess::new());
        let surface = Rc::new(MemorySurface::new(size));
        let view = Rc::new(DemoView::new(size, config.host.reserved_area));

        let host = hosts.create(HostContext {
            site: SiteId::new(),
            process: process.clone(),
            delegate: surface.clone(),
            routing_id: ROUTING_ID,
        })?;
        let host_view: Rc<dyn HostView> = view.clone();
        host.set_view(Rc::downgrade(&host_view));
        host.set_renderer_initialized(true);

        let renderer = SimulatedRenderer::new(ROUTING_ID, Rc::clone(&process), config.demo.scroll_step);

        Ok(Self {
            demo: config.demo.clone(),
            registration: Some(registration),
            hosts,
            process,
            surface,
            view,
            renderer,
            delivery: DeliveryStats::default(),
        })
    }

    pub fn host(&self) -> Option<&RenderHost> {
        self.hosts.get(ROUTING_ID)
    }

    #[cfg(test)]
    pub fn process(&self) -> &SimulatedProcess {
        &self.process
    }

    #[cfg(test)]
    pub fn delivery(&self) -> DeliveryStats {
        self.delivery
    }

    /// Run the initial size handshake, then `frames` renderer frames. The
    /// view grows every `resize_every` frames.
    pub fn run(&mut self, frames: u32) -> Result<SessionSummary, OffpaintError> {
        info!(routing_id = %ROUTING_ID, size = %self.view.size(), frames, "session starting");

        self.request_resize();
        self.pump()?;

        for n in 1..=frames {
            if n % self.demo.resize_every.max(1) == 0 {
                self.grow();
                self.pump()?;
            }
            if let Some(raw) = self.renderer.frame(n).map_err(encode_error)? {
                self.deliver(&raw);
            }
            self.pump()?;
        }

        let summary = self.summary(frames);
        info!(
            frames,
            applied = summary.delivery.applied,
            resizes = summary.delivery.resizes_requested,
            bad_messages = summary.bad_messages,
            "session finished"
        );
        Ok(summary)
    }

    /// Hand one renderer message to the host.
    pub fn deliver(&mut self, raw: &RawMessage) {
        let Some(host) = self.hosts.get_mut(ROUTING_ID) else {
            warn!(routing_id = %ROUTING_ID, kind = %raw.kind, "no host for route, message dropped");
            return;
        };

        match host.on_message_received(raw) {
            DispatchResult::Handled(Ok(report)) => {
                trace!(?report, "renderer message applied");
                self.delivery.record(&report);
            }
            DispatchResult::Handled(Err(err)) => {
                self.delivery.violations += 1;
                warn!(routing_id = %ROUTING_ID, error = %err, "renderer message rejected");
            }
            DispatchResult::DecodeFailed(kind) => {
                self.delivery.decode_failures += 1;
                warn!(routing_id = %ROUTING_ID, %kind, "renderer message undecodable");
            }
            DispatchResult::Unhandled => {
                debug!(routing_id = %ROUTING_ID, kind = %raw.kind, "not a paint transport message");
            }
        }
    }

    /// Let the renderer answer everything the host has sent so far.
    fn pump(&mut self) -> Result<(), OffpaintError> {
        while let Some(message) = self.process.next_outbound() {
            if let Some(reply) = self.renderer.handle(message).map_err(encode_error)? {
                self.deliver(&reply);
            }
        }
        Ok(())
    }

    fn request_resize(&mut self) {
        let Some(host) = self.hosts.get_mut(ROUTING_ID) else {
            return;
        };
        if host.request_resize().is_sent() {
            self.delivery.resizes_requested += 1;
        }
    }

    fn grow(&mut self) {
        let size = self.view.size();
        let next = ViewportSize::new(
            (size.width + GROW_BY.0).min(MAX_VIEWPORT_EDGE),
            (size.height + GROW_BY.1).min(MAX_VIEWPORT_EDGE),
        );
        if next == size {
            return;
        }
        debug!(from = %size, to = %next, "view resized");
        self.view.set_size(next);
        self.surface.resize(next);
        self.request_resize();
    }

    fn summary(&self, frames: u32) -> SessionSummary {
        SessionSummary {
            frames,
            view_size: self.view.size(),
            host_size: self
                .host()
                .map(RenderHost::current_size)
                .unwrap_or(ViewportSize::EMPTY),
            delivery: self.delivery,
            renderer: self.renderer.stats(),
            renderer_size: self.renderer.size(),
            surface_size: self.surface.size(),
            bad_messages: self.process.bad_messages().len(),
            outstanding_bitmaps: self.renderer.outstanding(),
            live_bitmaps: self.process.live_bitmaps(),
            surface_paints: self.surface.paints(),
            view_scrolls: self.view.scrolls(),
            view_repaints: self.view.repaints(),
            surface_checksum: self.surface.checksum(),
        }
    }
}

fn encode_error(e: serde_json::Error) -> OffpaintError {
    OffpaintError::Other(format!("failed to encode renderer message: {e}"))
}
