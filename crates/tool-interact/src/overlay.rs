//! Overlay dismissal pass run before every interaction round.
//!
//! Cookie banners, consent walls and modals routinely swallow the first
//! click on a page. The pass closes what it can, hides what it cannot, and
//! never fails the interaction: every recoverable problem here is logged
//! and swallowed.

use browser_adapter::{ElementNode, PageSnapshot, PortError, Session};
use tracing::{debug, warn};

use crate::errors::InteractError;

/// class/id keywords marking a blocking layer.
pub const OVERLAY_KEYWORDS: &[&str] = &[
    "cookie",
    "consent",
    "gdpr",
    "modal",
    "overlay",
    "popup",
    "banner",
    "interstitial",
];

/// Texts/labels of controls that close a blocking layer.
pub const CLOSE_CONTROL_TEXT: &[&str] = &[
    "×",
    "✕",
    "close",
    "accept",
    "accept all",
    "dismiss",
    "got it",
    "no thanks",
];

fn looks_like_overlay(node: &ElementNode) -> bool {
    if !node.displayed {
        return false;
    }
    let tag = node.tag.to_lowercase();
    if matches!(tag.as_str(), "button" | "a" | "input" | "form") {
        return false;
    }
    if node
        .role
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case("dialog"))
    {
        return true;
    }
    let haystack = node.attr_haystack();
    OVERLAY_KEYWORDS.iter().any(|kw| haystack.contains(kw))
}

fn is_close_control(node: &ElementNode) -> bool {
    if !node.is_interactive() {
        return false;
    }
    let text = node.visible_text.trim().to_lowercase();
    let label = node
        .aria_label
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    CLOSE_CONTROL_TEXT
        .iter()
        .any(|t| text == *t || label.contains(t))
        || node.attr_haystack().contains("close")
}

fn find_close_control(snapshot: &PageSnapshot, overlay: &ElementNode) -> Option<ElementNode> {
    snapshot
        .elements
        .iter()
        .find(|node| {
            node.handle != overlay.handle
                && snapshot.within(node.handle, overlay.handle)
                && is_close_control(node)
        })
        .cloned()
}

fn fatal(err: &PortError) -> Option<InteractError> {
    if err.is_fatal() {
        Some(InteractError::SessionCrashed(err.to_string()))
    } else {
        None
    }
}

/// Detect and neutralize blocking overlays. Returns how many layers were
/// handled. Only a dead browser is an error.
pub async fn dismiss_blocking_overlays(session: &Session) -> Result<u32, InteractError> {
    let snapshot = match session.port().snapshot().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            if let Some(crash) = fatal(&err) {
                return Err(crash);
            }
            warn!("overlay pass could not snapshot: {}", err);
            return Ok(0);
        }
    };

    let overlays: Vec<ElementNode> = snapshot
        .elements
        .iter()
        .filter(|node| looks_like_overlay(node))
        .cloned()
        .collect();

    let mut handled = 0u32;
    for overlay in &overlays {
        match find_close_control(&snapshot, overlay) {
            Some(control) => match session.port().invoke_click(control.handle).await {
                Ok(()) => {
                    debug!(overlay = ?overlay.handle, "overlay closed via control");
                    handled += 1;
                    continue;
                }
                Err(err) => {
                    if let Some(crash) = fatal(&err) {
                        return Err(crash);
                    }
                    warn!("overlay close control failed: {}", err);
                }
            },
            None => debug!(overlay = ?overlay.handle, "no close control found"),
        }
        // Close failed or absent: hide the layer outright.
        match session.port().hide_node(overlay.handle).await {
            Ok(()) => handled += 1,
            Err(err) => {
                if let Some(crash) = fatal(&err) {
                    return Err(crash);
                }
                warn!("overlay hide failed: {}", err);
            }
        }
    }

    if !overlays.is_empty() {
        // Escape as a last sweep for focus-trapping dialogs.
        if let Err(err) = session.port().press_escape().await {
            if let Some(crash) = fatal(&err) {
                return Err(crash);
            }
            warn!("escape dispatch failed: {}", err);
        }
    }

    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use browser_adapter::NodeHandle;

    fn overlay_div(handle: u64, class: &str) -> ElementNode {
        let mut node = ElementNode::new(NodeHandle(handle), "div");
        node.classes = vec![class.to_string()];
        node
    }

    #[test]
    fn test_overlay_detection_by_class() {
        assert!(looks_like_overlay(&overlay_div(1, "cookie-banner")));
        assert!(looks_like_overlay(&overlay_div(2, "modal-backdrop")));
        assert!(!looks_like_overlay(&overlay_div(3, "job-card")));
    }

    #[test]
    fn test_overlay_detection_skips_hidden_and_controls() {
        let mut hidden = overlay_div(1, "popup");
        hidden.displayed = false;
        assert!(!looks_like_overlay(&hidden));

        let mut button = ElementNode::new(NodeHandle(2), "button");
        button.classes = vec!["cookie-settings".to_string()];
        assert!(!looks_like_overlay(&button));
    }

    #[test]
    fn test_close_control_by_text_and_label() {
        let mut x = ElementNode::new(NodeHandle(1), "button");
        x.visible_text = "×".to_string();
        assert!(is_close_control(&x));

        let mut labeled = ElementNode::new(NodeHandle(2), "button");
        labeled.aria_label = Some("Dismiss cookie notice".to_string());
        assert!(is_close_control(&labeled));

        let mut other = ElementNode::new(NodeHandle(3), "button");
        other.visible_text = "Apply now".to_string();
        assert!(!is_close_control(&other));
    }

    #[test]
    fn test_find_close_control_scoped_to_overlay() {
        let overlay = overlay_div(1, "consent-modal");
        let mut inside = ElementNode::new(NodeHandle(2), "button");
        inside.visible_text = "Accept all".to_string();
        inside.parent = Some(NodeHandle(1));
        let mut outside = ElementNode::new(NodeHandle(3), "button");
        outside.visible_text = "close".to_string();
        let snapshot = PageSnapshot::new(vec![overlay.clone(), inside, outside]);

        let found = find_close_control(&snapshot, &overlay).unwrap();
        assert_eq!(found.handle, NodeHandle(2));
    }
}
