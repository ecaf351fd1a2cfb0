//! Session: one exclusively-owned browser handle.

use std::sync::Arc;

use applypilot_core_types::SessionId;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::errors::SessionError;
use crate::model::{NodeHandle, PageSnapshot, PageState};
use crate::port::BrowserPort;

/// One isolated browser automation handle plus its configuration.
///
/// A session is owned by exactly one worker for its whole lifetime and is
/// deliberately not `Clone`: DOM automation against one tab is sequential,
/// so all calls flow through the single owner. Fatal port failures are
/// mapped to [`SessionError::Crashed`] here, at the boundary.
pub struct Session {
    id: SessionId,
    config: SessionConfig,
    port: Arc<dyn BrowserPort>,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(config: SessionConfig, port: Arc<dyn BrowserPort>) -> Self {
        let id = SessionId::new();
        info!(session = %id, headless = config.headless, "session created");
        Self {
            id,
            config,
            port,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Raw port access for the executor's dispatch strategies.
    pub fn port(&self) -> &Arc<dyn BrowserPort> {
        &self.port
    }

    pub async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        debug!(session = %self.id, url, "navigating");
        Ok(self.port.navigate(url).await?)
    }

    pub async fn snapshot(&self) -> Result<PageSnapshot, SessionError> {
        Ok(self.port.snapshot().await?)
    }

    pub async fn page_state(&self) -> Result<PageState, SessionError> {
        Ok(self.port.page_state().await?)
    }

    pub async fn page_text(&self) -> Result<String, SessionError> {
        Ok(self.port.page_text().await?)
    }

    pub async fn scroll_into_view(&self, node: NodeHandle) -> Result<(), SessionError> {
        Ok(self.port.scroll_into_view(node).await?)
    }

    /// Tear the session down. The port owner terminates the browser process;
    /// after this the session must not be used.
    pub fn teardown(self) {
        debug!(session = %self.id, "session teardown");
        drop(self.port);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::errors::PortError;

    struct DeadPort;

    #[async_trait]
    impl BrowserPort for DeadPort {
        async fn navigate(&self, _url: &str) -> Result<(), PortError> {
            Err(PortError::BrowserGone("process exited".into()))
        }
        async fn snapshot(&self) -> Result<PageSnapshot, PortError> {
            Err(PortError::BrowserGone("process exited".into()))
        }
        async fn page_state(&self) -> Result<PageState, PortError> {
            Err(PortError::Timeout("no response".into()))
        }
        async fn page_text(&self) -> Result<String, PortError> {
            Err(PortError::BrowserGone("process exited".into()))
        }
        async fn scroll_into_view(&self, _node: NodeHandle) -> Result<(), PortError> {
            Ok(())
        }
        async fn click(&self, _node: NodeHandle) -> Result<(), PortError> {
            Ok(())
        }
        async fn dispatch_click_event(&self, _node: NodeHandle) -> Result<(), PortError> {
            Ok(())
        }
        async fn invoke_click(&self, _node: NodeHandle) -> Result<(), PortError> {
            Ok(())
        }
        async fn pointer_click(&self, _node: NodeHandle) -> Result<(), PortError> {
            Ok(())
        }
        async fn fill_native(&self, _node: NodeHandle, _value: &str) -> Result<(), PortError> {
            Ok(())
        }
        async fn fill_scripted(&self, _node: NodeHandle, _value: &str) -> Result<(), PortError> {
            Ok(())
        }
        async fn press_escape(&self) -> Result<(), PortError> {
            Ok(())
        }
        async fn hide_node(&self, _node: NodeHandle) -> Result<(), PortError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_fatal_port_error_becomes_crash() {
        let session = Session::new(SessionConfig::default(), Arc::new(DeadPort));
        let err = session.snapshot().await.unwrap_err();
        assert!(err.is_crash());
    }

    #[tokio::test]
    async fn test_recoverable_port_error_stays_port() {
        let session = Session::new(SessionConfig::default(), Arc::new(DeadPort));
        let err = session.page_state().await.unwrap_err();
        assert!(!err.is_crash());
    }
}
