//! Core types for the locator system.

use browser_adapter::{BoundingBox, NodeHandle};
use serde::{Deserialize, Serialize};

/// Locator strategy enumeration, in fixed chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Visible-text match against the intent's synonym set.
    TextMatch,

    /// Accessible-name / aria-label match.
    AriaLabel,

    /// class/id substring match against curated keywords.
    ClassHeuristic,

    /// Clickable-descendant fallback inside a scoped container.
    ContainerScope,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::TextMatch => "text-match",
            StrategyKind::AriaLabel => "aria-label",
            StrategyKind::ClassHeuristic => "class-heuristic",
            StrategyKind::ContainerScope => "container-scope",
        }
    }

    /// Fixed confidence weight. Text beats aria beats class beats structure.
    pub fn weight(&self) -> f64 {
        match self {
            StrategyKind::TextMatch => 0.9,
            StrategyKind::AriaLabel => 0.8,
            StrategyKind::ClassHeuristic => 0.6,
            StrategyKind::ContainerScope => 0.45,
        }
    }

    /// All strategies in chain order.
    pub fn chain() -> Vec<StrategyKind> {
        vec![
            StrategyKind::TextMatch,
            StrategyKind::AriaLabel,
            StrategyKind::ClassHeuristic,
            StrategyKind::ContainerScope,
        ]
    }
}

/// What kind of control the caller wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentKind {
    /// The primary submit/apply control of the page or card.
    SubmitControl,

    /// A fillable text field whose accessible naming matches the given role
    /// ("email", "full name", ...).
    TextField(String),
}

/// Semantic element request. Never a literal selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    /// Restrict matching to descendants of this container ("within this job
    /// card"). `None` means the whole page.
    pub scope: Option<NodeHandle>,
}

impl Intent {
    pub fn submit_control() -> Self {
        Self {
            kind: IntentKind::SubmitControl,
            scope: None,
        }
    }

    pub fn text_field(role: impl Into<String>) -> Self {
        Self {
            kind: IntentKind::TextField(role.into()),
            scope: None,
        }
    }

    pub fn within(mut self, scope: NodeHandle) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// A ranked, ephemeral reference to an interactive element.
///
/// Recomputed fresh for every interaction attempt; never cached across page
/// reloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub handle: NodeHandle,
    pub strategy: StrategyKind,
    /// Confidence score in [0, 1].
    pub confidence: f64,
    pub visible_text: String,
    pub tag: String,
    pub role: Option<String>,
    /// class/id snapshot taken at match time, for diagnostics.
    pub attributes: Vec<String>,
    pub bbox: BoundingBox,
}

impl Candidate {
    /// Deduplication identity: same geometry plus same text is the same
    /// control, whichever strategy found it.
    pub fn dedup_key(&self) -> (BoundingBox, String) {
        (self.bbox, self.visible_text.clone())
    }
}
