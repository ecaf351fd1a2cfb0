//! Locator strategies: pure functions from a page snapshot to candidates.
//!
//! Adding support for a new site's markup means adding or extending a
//! strategy, not branching logic. Each strategy runs against a freshly
//! queried snapshot supplied by the resolver.

use browser_adapter::{ElementNode, PageSnapshot};

use crate::types::{Candidate, Intent, IntentKind, StrategyKind};

/// Visible-text synonyms for a submit/apply control.
pub const APPLY_SYNONYMS: &[&str] = &[
    "apply",
    "apply now",
    "easy apply",
    "quick apply",
    "submit",
    "submit application",
    "send application",
];

/// class/id keywords hinting at an apply control.
pub const APPLY_CLASS_KEYWORDS: &[&str] = &[
    "apply",
    "apply-btn",
    "apply-button",
    "jobs-apply",
    "submit",
    "submit-btn",
];

/// One method for turning an intent into candidates.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Collect candidates from the snapshot. Non-matching intents yield an
    /// empty list, never an error.
    fn candidates(&self, snapshot: &PageSnapshot, intent: &Intent) -> Vec<Candidate>;

    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

fn in_scope(snapshot: &PageSnapshot, node: &ElementNode, intent: &Intent) -> bool {
    match intent.scope {
        Some(scope) => snapshot.within(node.handle, scope),
        None => true,
    }
}

fn is_clickable_control(node: &ElementNode) -> bool {
    let tag = node.tag.to_lowercase();
    match tag.as_str() {
        "button" | "a" => true,
        "input" => node
            .input_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("submit") || t.eq_ignore_ascii_case("button")),
        _ => node.role.as_deref().is_some_and(|r| r.eq_ignore_ascii_case("button")),
    }
}

fn is_fillable_field(node: &ElementNode) -> bool {
    let tag = node.tag.to_lowercase();
    match tag.as_str() {
        "textarea" => true,
        "input" => !node.input_type.as_deref().is_some_and(|t| {
            t.eq_ignore_ascii_case("submit")
                || t.eq_ignore_ascii_case("button")
                || t.eq_ignore_ascii_case("checkbox")
                || t.eq_ignore_ascii_case("radio")
                || t.eq_ignore_ascii_case("file")
        }),
        _ => node
            .role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("textbox")),
    }
}

fn candidate_from(node: &ElementNode, kind: StrategyKind) -> Candidate {
    let mut attributes = node.classes.clone();
    if let Some(id) = &node.id_attr {
        attributes.push(format!("#{}", id));
    }
    Candidate {
        handle: node.handle,
        strategy: kind,
        confidence: kind.weight(),
        visible_text: node.visible_text.trim().to_string(),
        tag: node.tag.clone(),
        role: node.role.clone(),
        attributes,
        bbox: node.bbox,
    }
}

fn text_matches_any(text: &str, needles: &[&str]) -> bool {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return false;
    }
    needles
        .iter()
        .any(|needle| lowered == *needle || lowered.contains(needle))
}

/// Strategy 1: exact/contains visible-text match against the synonym set.
pub struct TextMatchStrategy;

impl Strategy for TextMatchStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TextMatch
    }

    fn candidates(&self, snapshot: &PageSnapshot, intent: &Intent) -> Vec<Candidate> {
        snapshot
            .elements
            .iter()
            .filter(|node| in_scope(snapshot, node, intent))
            .filter(|node| match &intent.kind {
                IntentKind::SubmitControl => {
                    is_clickable_control(node)
                        && text_matches_any(&node.visible_text, APPLY_SYNONYMS)
                }
                IntentKind::TextField(role) => {
                    is_fillable_field(node) && text_matches_any(&node.visible_text, &[role.as_str()])
                }
            })
            .map(|node| candidate_from(node, self.kind()))
            .collect()
    }
}

/// Strategy 2: accessible-name / aria-label match.
pub struct AriaLabelStrategy;

impl Strategy for AriaLabelStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AriaLabel
    }

    fn candidates(&self, snapshot: &PageSnapshot, intent: &Intent) -> Vec<Candidate> {
        snapshot
            .elements
            .iter()
            .filter(|node| in_scope(snapshot, node, intent))
            .filter(|node| {
                let label = match &node.aria_label {
                    Some(label) => label,
                    None => return false,
                };
                match &intent.kind {
                    IntentKind::SubmitControl => {
                        is_clickable_control(node) && text_matches_any(label, APPLY_SYNONYMS)
                    }
                    IntentKind::TextField(role) => {
                        is_fillable_field(node) && text_matches_any(label, &[role.as_str()])
                    }
                }
            })
            .map(|node| candidate_from(node, self.kind()))
            .collect()
    }
}

/// Strategy 3: class/id substring match against the curated keyword list.
pub struct ClassHeuristicStrategy;

impl Strategy for ClassHeuristicStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ClassHeuristic
    }

    fn candidates(&self, snapshot: &PageSnapshot, intent: &Intent) -> Vec<Candidate> {
        let keywords: Vec<&str> = match &intent.kind {
            IntentKind::SubmitControl => APPLY_CLASS_KEYWORDS.to_vec(),
            // Field naming conventions are too site-specific for a curated
            // list; reuse the requested role itself as the keyword.
            IntentKind::TextField(role) => vec![role.as_str()],
        };
        snapshot
            .elements
            .iter()
            .filter(|node| in_scope(snapshot, node, intent))
            .filter(|node| match &intent.kind {
                IntentKind::SubmitControl => !node.tag.eq_ignore_ascii_case("form"),
                IntentKind::TextField(_) => is_fillable_field(node),
            })
            .filter(|node| {
                let haystack = node.attr_haystack();
                keywords.iter().any(|kw| haystack.contains(kw))
            })
            .map(|node| candidate_from(node, self.kind()))
            .collect()
    }
}

/// Strategy 4: last-resort clickable descendant of the scoped container.
///
/// Only fires for scoped intents; with no scope there is no container to
/// reason about and the strategy stays silent.
pub struct ContainerScopeStrategy;

impl Strategy for ContainerScopeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ContainerScope
    }

    fn candidates(&self, snapshot: &PageSnapshot, intent: &Intent) -> Vec<Candidate> {
        let scope = match intent.scope {
            Some(scope) => scope,
            None => return Vec::new(),
        };
        if !matches!(intent.kind, IntentKind::SubmitControl) {
            return Vec::new();
        }
        snapshot
            .elements
            .iter()
            .filter(|node| node.handle != scope && snapshot.within(node.handle, scope))
            .filter(|node| is_clickable_control(node))
            .map(|node| candidate_from(node, self.kind()))
            .collect()
    }
}

/// The default chain, in order.
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(TextMatchStrategy),
        Box::new(AriaLabelStrategy),
        Box::new(ClassHeuristicStrategy),
        Box::new(ContainerScopeStrategy),
    ]
}
