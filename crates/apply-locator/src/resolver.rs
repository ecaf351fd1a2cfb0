//! Element locator: runs the strategy chain over a fresh snapshot.

use std::collections::HashMap;

use browser_adapter::Session;
use tracing::{debug, info};

use crate::errors::LocatorError;
use crate::strategies::{default_strategies, Strategy};
use crate::types::{Candidate, Intent};

/// Capability-based locator. Holds the ordered strategy chain; every call
/// queries the DOM fresh so no candidate survives a navigation.
pub struct ElementLocator {
    strategies: Vec<Box<dyn Strategy>>,
}

impl ElementLocator {
    pub fn new() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }

    /// Build a locator with a custom chain (order is significant).
    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Resolve an intent into ranked candidates.
    ///
    /// Returns an empty list when nothing matches; the caller decides how to
    /// proceed. Non-displayed and disabled elements are filtered out before
    /// ranking.
    pub async fn locate(
        &self,
        session: &Session,
        intent: &Intent,
    ) -> Result<Vec<Candidate>, LocatorError> {
        let snapshot = session.snapshot().await?;
        debug!(
            elements = snapshot.elements.len(),
            intent = ?intent.kind,
            "locator snapshot taken"
        );

        let mut merged: Vec<Candidate> = Vec::new();
        let mut seen: HashMap<(browser_adapter::BoundingBox, String), usize> = HashMap::new();

        for strategy in &self.strategies {
            let found = strategy.candidates(&snapshot, intent);
            if found.is_empty() {
                continue;
            }
            debug!(
                strategy = strategy.name(),
                count = found.len(),
                "strategy produced candidates"
            );
            for candidate in found {
                let interactive = snapshot
                    .get(candidate.handle)
                    .map(|node| node.is_interactive())
                    .unwrap_or(false);
                if !interactive {
                    continue;
                }
                match seen.get(&candidate.dedup_key()) {
                    Some(&index) => {
                        // Same control found twice; keep the stronger score.
                        if candidate.confidence > merged[index].confidence {
                            merged[index] = candidate;
                        }
                    }
                    None => {
                        seen.insert(candidate.dedup_key(), merged.len());
                        merged.push(candidate);
                    }
                }
            }
        }

        merged.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(
            candidates = merged.len(),
            best = merged.first().map(|c| c.strategy.name()).unwrap_or("none"),
            "locate finished"
        );
        Ok(merged)
    }
}

impl Default for ElementLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrategyKind;
    use async_trait::async_trait;
    use browser_adapter::{
        BoundingBox, BrowserPort, ElementNode, NodeHandle, PageSnapshot, PageState, PortError,
        SessionConfig,
    };
    use std::sync::Arc;

    struct FixedPort {
        elements: Vec<ElementNode>,
    }

    #[async_trait]
    impl BrowserPort for FixedPort {
        async fn navigate(&self, _url: &str) -> Result<(), PortError> {
            Ok(())
        }
        async fn snapshot(&self) -> Result<PageSnapshot, PortError> {
            Ok(PageSnapshot::new(self.elements.clone()))
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

    fn session_with(elements: Vec<ElementNode>) -> browser_adapter::Session {
        browser_adapter::Session::new(SessionConfig::default(), Arc::new(FixedPort { elements }))
    }

    fn apply_button(handle: u64, y: i32) -> ElementNode {
        let mut node = ElementNode::new(NodeHandle(handle), "button");
        node.visible_text = "Apply now".to_string();
        node.bbox = BoundingBox::new(0, y, 120, 32);
        node
    }

    #[tokio::test]
    async fn test_empty_page_yields_empty_list() {
        let session = session_with(vec![]);
        let found = ElementLocator::new()
            .locate(&session, &Intent::submit_control())
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_aria_outranks_class_heuristic() {
        let mut aria = ElementNode::new(NodeHandle(1), "button");
        aria.aria_label = Some("Apply now".to_string());
        aria.bbox = BoundingBox::new(0, 0, 100, 30);
        let mut classy = ElementNode::new(NodeHandle(2), "a");
        classy.classes = vec!["apply-button".to_string()];
        classy.bbox = BoundingBox::new(0, 50, 100, 30);
        let session = session_with(vec![aria, classy]);

        let found = ElementLocator::new()
            .locate(&session, &Intent::submit_control())
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].strategy, StrategyKind::AriaLabel);
        assert_eq!(found[1].strategy, StrategyKind::ClassHeuristic);
        assert!(found[0].confidence > found[1].confidence);
    }

    #[tokio::test]
    async fn test_dedup_keeps_strongest_strategy() {
        // One control matched by both text and class heuristics.
        let mut node = apply_button(1, 0);
        node.classes = vec!["apply-btn".to_string()];
        let session = session_with(vec![node]);

        let found = ElementLocator::new()
            .locate(&session, &Intent::submit_control())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].strategy, StrategyKind::TextMatch);
    }

    #[tokio::test]
    async fn test_hidden_and_disabled_filtered() {
        let mut hidden = apply_button(1, 0);
        hidden.displayed = false;
        let mut disabled = apply_button(2, 40);
        disabled.enabled = false;
        let visible = apply_button(3, 80);
        let session = session_with(vec![hidden, disabled, visible]);

        let found = ElementLocator::new()
            .locate(&session, &Intent::submit_control())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].handle, NodeHandle(3));
    }
}
