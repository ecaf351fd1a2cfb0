//! The browser port: the seam between the engine and a concrete driver.
//!
//! Implementations wrap whatever automation transport the deployment uses
//! (CDP, WebDriver, an in-process fake for tests). Every method is bounded:
//! an implementation must never wait indefinitely.

use async_trait::async_trait;

use crate::errors::PortError;
use crate::model::{NodeHandle, PageSnapshot, PageState};

/// Driver operations needed by the locator, executor and verifier.
///
/// All DOM reads go through [`BrowserPort::snapshot`] so callers operate on
/// values rather than live references. Dispatch methods take a handle from
/// the most recent snapshot and fail with [`PortError::NodeGone`] when the
/// element has been replaced since.
#[async_trait]
pub trait BrowserPort: Send + Sync {
    /// Navigate to a URL and wait (bounded) for the load to settle.
    async fn navigate(&self, url: &str) -> Result<(), PortError>;

    /// Query a fresh snapshot of interactive and structural elements.
    async fn snapshot(&self) -> Result<PageSnapshot, PortError>;

    /// Current URL and title.
    async fn page_state(&self) -> Result<PageState, PortError>;

    /// Full visible text of the page body.
    async fn page_text(&self) -> Result<String, PortError>;

    /// Scroll the element into the viewport center.
    async fn scroll_into_view(&self, node: NodeHandle) -> Result<(), PortError>;

    /// Native input-device click.
    async fn click(&self, node: NodeHandle) -> Result<(), PortError>;

    /// Dispatch a bubbling `MouseEvent("click")` at the node.
    async fn dispatch_click_event(&self, node: NodeHandle) -> Result<(), PortError>;

    /// Programmatic `element.click()` invocation.
    async fn invoke_click(&self, node: NodeHandle) -> Result<(), PortError>;

    /// Synthetic pointer sequence: move, press, release.
    async fn pointer_click(&self, node: NodeHandle) -> Result<(), PortError>;

    /// Native keystroke fill of a field.
    async fn fill_native(&self, node: NodeHandle, value: &str) -> Result<(), PortError>;

    /// Scripted value assignment plus input/change events.
    async fn fill_scripted(&self, node: NodeHandle, value: &str) -> Result<(), PortError>;

    /// Send Escape to the focused document (overlay fallback).
    async fn press_escape(&self) -> Result<(), PortError>;

    /// Force-hide a node via style manipulation.
    async fn hide_node(&self, node: NodeHandle) -> Result<(), PortError>;
}
