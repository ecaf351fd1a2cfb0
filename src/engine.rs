//! Engine wiring: one shared ledger, one worker per browser port.

use std::sync::Arc;

use apply_gate::VerificationEngine;
use apply_ledger::Ledger;
use apply_locator::ElementLocator;
use applypilot_orchestrator::Worker;
use browser_adapter::{BrowserPort, Session};
use tool_interact::InteractionExecutor;
use tracing::info;

use crate::config::EngineConfig;
use crate::errors::Error;

/// Deployment-level composition root.
///
/// Holds the shared ledger and the configuration; hands out one [`Worker`]
/// per driver port. Workers run independently — on separate tasks if the
/// caller wants parallelism — and coordinate only through the ledger.
pub struct Engine {
    config: EngineConfig,
    ledger: Arc<Ledger>,
}

impl Engine {
    pub async fn new(config: EngineConfig) -> Result<Self, Error> {
        let ledger = match &config.ledger_path {
            Some(path) => {
                info!(path = %path.display(), "opening ledger");
                Ledger::open(path).await?
            }
            None => Ledger::in_memory().await?,
        };
        Ok(Self {
            config,
            ledger: Arc::new(ledger),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> Arc<Ledger> {
        self.ledger.clone()
    }

    /// Build a worker around a concrete driver port. The session created
    /// here is exclusively owned by the returned worker.
    pub fn worker(&self, port: Arc<dyn BrowserPort>) -> Worker {
        let session = Session::new(self.config.session.clone(), port);
        Worker::new(
            session,
            ElementLocator::new(),
            InteractionExecutor::new(self.config.retry.clone()),
            VerificationEngine::new(self.config.verify.clone()),
            self.ledger.clone(),
            self.config.worker.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use browser_adapter::{NodeHandle, PageSnapshot, PageState, PortError};

    struct NullPort;

    #[async_trait]
    impl BrowserPort for NullPort {
        async fn navigate(&self, _url: &str) -> Result<(), PortError> {
            Ok(())
        }
        async fn snapshot(&self) -> Result<PageSnapshot, PortError> {
            Ok(PageSnapshot::new(vec![]))
        }
        async fn page_state(&self) -> Result<PageState, PortError> {
            Ok(PageState::default())
        }
        async fn page_text(&self) -> Result<String, PortError> {
            Ok(String::new())
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
    async fn test_engine_builds_and_runs_worker() {
        let engine = Engine::new(EngineConfig::default()).await.unwrap();
        let worker = engine.worker(Arc::new(NullPort));
        let summary = worker
            .run(Vec::<applypilot_core_types::JobCandidate>::new())
            .await
            .unwrap();
        assert_eq!(summary.attempted, 0);
    }
}
