//! Orderly teardown: hosts first, then the connection, then the factory.

use tracing::info;

use super::core::Session;

impl Session {
    pub fn shutdown(&mut self) {
        info!("session shutting down");

        // Hosts go before the connection so none of them outlives it.
        self.hosts.destroy_all();
        self.process.disconnect();
        self.registration = None;

        info!("session shut down");
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use offpaint_common::EventBus;
    use offpaint_config::schema::OffpaintConfig;
    use offpaint_host::RenderProcessHost;

    use super::*;

    fn session() -> Session {
        Session::new(&OffpaintConfig::default(), Rc::new(EventBus::default())).unwrap()
    }

    #[test]
    fn shutdown_after_run_releases_everything() {
        let mut s = session();
        s.run(4).unwrap();
        s.shutdown();

        assert!(s.host().is_none());
        assert!(!s.process().has_connection());
        assert_eq!(s.process().live_bitmaps(), 0);
        assert!(s.registration.is_none());
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut s = session();
        s.shutdown();
        s.shutdown();
        assert!(s.host().is_none());
    }
}
