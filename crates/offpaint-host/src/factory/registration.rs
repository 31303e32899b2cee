use std::cell::RefCell;
use std::rc::{Rc, Weak};

use offpaint_common::{EventBus, HostEvent, RegistryError};
use tracing::{debug, info};

use crate::host::{HostOptions, RenderHost};

use super::{HostContext, HostFactory};

/// Process-wide slot for the factory that creates view hosts.
pub struct FactoryRegistry {
    current: RefCell<Option<Rc<dyn HostFactory>>>,
    events: Rc<EventBus>,
}

impl FactoryRegistry {
    pub fn new(events: Rc<EventBus>) -> Rc<Self> {
        Rc::new(Self {
            current: RefCell::new(None),
            events,
        })
    }

    /// Install `factory` as the creator of view hosts.
    pub fn register(
        self: &Rc<Self>,
        factory: Rc<dyn HostFactory>,
    ) -> Result<FactoryRegistration, RegistryError> {
        let mut current = self.current.borrow_mut();
        if current.is_some() {
            return Err(RegistryError::FactoryAlreadyRegistered);
        }
        *current = Some(factory);
        drop(current);

        info!("host factory registered");
        self.events.publish(HostEvent::FactoryRegistered);
        Ok(FactoryRegistration {
            registry: Rc::downgrade(self),
        })
    }

    pub fn is_registered(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Build a view host through the registered factory, or with default
    /// options when none is registered.
    pub fn create_host(&self, context: HostContext) -> RenderHost {
        let factory = self.current.borrow().clone();
        match factory {
            Some(factory) => factory.create_host(context),
            None => {
                debug!(routing_id = %context.routing_id, "no factory registered, using defaults");
                RenderHost::new_view(
                    context.site,
                    context.process,
                    context.delegate,
                    context.routing_id,
                    HostOptions::default(),
                )
            }
        }
    }

    fn unregister(&self) {
        if self.current.borrow_mut().take().is_some() {
            info!("host factory unregistered");
            self.events.publish(HostEvent::FactoryUnregistered);
        }
    }
}

/// Keeps a factory registered. Dropping it unregisters the factory.
#[must_use = "the factory is unregistered when this handle is dropped"]
pub struct FactoryRegistration {
    registry: Weak<FactoryRegistry>,
}

impl Drop for FactoryRegistration {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister();
        }
    }
}
