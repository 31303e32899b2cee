use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use offpaint_common::{EventBus, HostEvent, RegistryError, RoutingId};
use tracing::debug;

use crate::factory::{FactoryRegistry, HostContext};
use crate::host::{HostOptions, RenderHost};
use crate::transport::RenderProcessHost;
use crate::view::{HostView, PaintDelegate};

/// Live render hosts keyed by routing id.
pub struct HostRegistry {
    factories: Rc<FactoryRegistry>,
    events: Rc<EventBus>,
    widget_options: HostOptions,
    hosts: HashMap<RoutingId, RenderHost>,
}

impl HostRegistry {
    pub fn new(factories: Rc<FactoryRegistry>, events: Rc<EventBus>) -> Self {
        Self {
            factories,
            events,
            widget_options: HostOptions::default(),
            hosts: HashMap::new(),
        }
    }

    /// Options given to widget hosts, which bypass the factory.
    pub fn with_widget_options(mut self, options: HostOptions) -> Self {
        self.widget_options = options;
        self
    }

    /// Create a view host through the registered factory and track it.
    pub fn create(&mut self, context: HostContext) -> Result<&mut RenderHost, RegistryError> {
        let routing_id = context.routing_id;
        self.ensure_free(routing_id)?;
        let host = self.factories.create_host(context);
        self.insert(host)
    }

    /// Create a widget host bound to an existing process and view.
    pub fn create_widget(
        &mut self,
        process: Rc<dyn RenderProcessHost>,
        delegate: Rc<dyn PaintDelegate>,
        view: Weak<dyn HostView>,
        routing_id: RoutingId,
    ) -> Result<&mut RenderHost, RegistryError> {
        self.ensure_free(routing_id)?;
        let mut host =
            RenderHost::new_widget(process, delegate, routing_id, self.widget_options.clone());
        host.set_view(view);
        self.insert(host)
    }

    pub fn get(&self, routing_id: RoutingId) -> Option<&RenderHost> {
        self.hosts.get(&routing_id)
    }

    pub fn get_mut(&mut self, routing_id: RoutingId) -> Option<&mut RenderHost> {
        self.hosts.get_mut(&routing_id)
    }

    /// Drop the host for `routing_id`.
    pub fn destroy(&mut self, routing_id: RoutingId) -> bool {
        if self.hosts.remove(&routing_id).is_some() {
            debug!(%routing_id, "render host destroyed");
            self.events.publish(HostEvent::HostDestroyed { routing_id });
            true
        } else {
            false
        }
    }

    /// Routing ids with a live host, in ascending order.
    pub fn active_routes(&self) -> Vec<RoutingId> {
        let mut routes: Vec<RoutingId> = self.hosts.keys().copied().collect();
        routes.sort();
        routes
    }

    /// Destroy every host. Used during shutdown.
    pub fn destroy_all(&mut self) {
        for routing_id in self.active_routes() {
            self.destroy(routing_id);
        }
        self.events.publish(HostEvent::Shutdown);
    }

    pub fn count(&self) -> usize {
        self.hosts.len()
    }

    fn ensure_free(&self, routing_id: RoutingId) -> Result<(), RegistryError> {
        if self.hosts.contains_key(&routing_id) {
            return Err(RegistryError::RouteInUse(routing_id));
        }
        Ok(())
    }

    /// Track a freshly built host. Callers check the route with
    /// `ensure_free` before building, so an occupied slot is only reported.
    fn insert(&mut self, host: RenderHost) -> Result<&mut RenderHost, RegistryError> {
        let routing_id = host.routing_id();
        match self.hosts.entry(routing_id) {
            Entry::Occupied(_) => Err(RegistryError::RouteInUse(routing_id)),
            Entry::Vacant(slot) => {
                self.events.publish(HostEvent::HostCreated {
                    routing_id,
                    kind: host.kind(),
                });
                Ok(slot.insert(host))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::MemoryHostFactory;
    use crate::testing::Harness;
    use offpaint_common::{HostKind, Rect, SiteId};

    struct Fixture {
        harness: Harness,
        events: Rc<EventBus>,
        factories: Rc<FactoryRegistry>,
    }

    impl Fixture {
        fn new() -> Self {
            let events = Rc::new(EventBus::default());
            let factories = FactoryRegistry::new(Rc::clone(&events));
            Self {
                harness: Harness::new(),
                events,
                factories,
            }
        }

        fn registry(&self) -> HostRegistry {
            HostRegistry::new(Rc::clone(&self.factories), Rc::clone(&self.events))
        }

        fn context(&self, routing_id: i32) -> HostContext {
            HostContext {
                site: SiteId::new(),
                process: self.harness.process.clone(),
                delegate: self.harness.delegate.clone(),
                routing_id: RoutingId(routing_id),
            }
        }
    }

    #[test]
    fn create_and_get() {
        let fx = Fixture::new();
        let mut registry = fx.registry();
        let host = registry.create(fx.context(1)).unwrap();
        assert_eq!(host.kind(), HostKind::View);
        assert_eq!(registry.count(), 1);
        assert!(registry.get(RoutingId(1)).is_some());
        assert!(registry.get(RoutingId(2)).is_none());
    }

    #[test]
    fn duplicate_route_is_rejected() {
        let fx = Fixture::new();
        let mut registry = fx.registry();
        registry.create(fx.context(1)).unwrap();
        let err = registry.create(fx.context(1)).err();
        assert_eq!(err, Some(RegistryError::RouteInUse(RoutingId(1))));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn duplicate_widget_route_keeps_first_host() {
        let fx = Fixture::new();
        let mut rx = fx.events.subscribe();
        let mut registry = fx.registry();
        registry.create(fx.context(7)).unwrap();

        let err = registry
            .create_widget(
                fx.harness.process.clone(),
                fx.harness.delegate.clone(),
                fx.harness.weak_view(),
                RoutingId(7),
            )
            .err();
        assert_eq!(err, Some(RegistryError::RouteInUse(RoutingId(7))));
        assert_eq!(
            registry.get(RoutingId(7)).map(RenderHost::kind),
            Some(HostKind::View)
        );
        assert!(matches!(
            rx.try_recv(),
            Ok(HostEvent::HostCreated { routing_id: RoutingId(7), .. })
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn create_uses_registered_factory() {
        let fx = Fixture::new();
        let options = HostOptions {
            reserved_area: Rect::new(0, 0, 15, 15),
            await_initial_resize_ack: false,
        };
        let _handle = MemoryHostFactory::register(&fx.factories, options.clone()).unwrap();
        let mut registry = fx.registry();
        let host = registry.create(fx.context(5)).unwrap();
        assert_eq!(host.options(), &options);
    }

    #[test]
    fn widget_hosts_get_widget_options_and_view() {
        let fx = Fixture::new();
        let options = HostOptions {
            reserved_area: Rect::default(),
            await_initial_resize_ack: false,
        };
        let mut registry = fx.registry().with_widget_options(options);
        let host = registry
            .create_widget(
                fx.harness.process.clone(),
                fx.harness.delegate.clone(),
                fx.harness.weak_view(),
                RoutingId(9),
            )
            .unwrap();
        assert_eq!(host.kind(), HostKind::Widget);
        assert!(host.site().is_none());
        assert!(host.view().is_some());
        assert!(!host.resize_ack_pending());
    }

    #[test]
    fn destroy_and_destroy_all() {
        let fx = Fixture::new();
        let mut registry = fx.registry();
        for id in [3, 1, 2] {
            registry.create(fx.context(id)).unwrap();
        }
        assert_eq!(
            registry.active_routes(),
            vec![RoutingId(1), RoutingId(2), RoutingId(3)]
        );

        assert!(registry.destroy(RoutingId(2)));
        assert!(!registry.destroy(RoutingId(2)));
        assert_eq!(registry.count(), 2);

        registry.destroy_all();
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test]
    async fn lifecycle_events() {
        let fx = Fixture::new();
        let mut rx = fx.events.subscribe();
        let mut registry = fx.registry();

        registry.create(fx.context(4)).unwrap();
        registry.destroy_all();

        let created = rx.recv().await.unwrap();
        assert!(matches!(
            created,
            HostEvent::HostCreated { routing_id: RoutingId(4), kind: HostKind::View }
        ));
        let destroyed = rx.recv().await.unwrap();
        assert!(matches!(destroyed, HostEvent::HostDestroyed { routing_id: RoutingId(4) }));
        assert!(matches!(rx.recv().await.unwrap(), HostEvent::Shutdown));
    }
}
