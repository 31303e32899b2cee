//! Host construction.
//!
//! A [`HostFactory`] builds the render host for a new page view. One
//! factory at a time may be registered with the process-wide
//! [`FactoryRegistry`]; without one, hosts get default options.

use std::rc::Rc;

use offpaint_common::{RegistryError, RoutingId, SiteId};

use crate::host::{HostOptions, RenderHost};
use crate::transport::RenderProcessHost;
use crate::view::PaintDelegate;

mod registration;

pub use registration::{FactoryRegistration, FactoryRegistry};

/// Everything a new view host is bound to.
#[derive(Clone)]
pub struct HostContext {
    pub site: SiteId,
    pub process: Rc<dyn RenderProcessHost>,
    pub delegate: Rc<dyn PaintDelegate>,
    pub routing_id: RoutingId,
}

pub trait HostFactory {
    fn create_host(&self, context: HostContext) -> RenderHost;
}

/// Builds view hosts that paint into host-owned memory with fixed options.
#[derive(Debug, Clone, Default)]
pub struct MemoryHostFactory {
    options: HostOptions,
}

impl MemoryHostFactory {
    pub fn new(options: HostOptions) -> Self {
        Self { options }
    }

    /// Create a factory and register it; it stays registered until the
    /// returned handle is dropped.
    pub fn register(
        registry: &Rc<FactoryRegistry>,
        options: HostOptions,
    ) -> Result<FactoryRegistration, RegistryError> {
        registry.register(Rc::new(Self::new(options)))
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }
}

impl HostFactory for MemoryHostFactory {
    fn create_host(&self, context: HostContext) -> RenderHost {
        RenderHost::new_view(
            context.site,
            context.process,
            context.delegate,
            context.routing_id,
            self.options.clone(),
        )
    }
}
