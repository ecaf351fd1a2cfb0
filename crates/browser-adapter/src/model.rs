//! Page snapshot model shared by locator, executor and verifier.
//!
//! A snapshot is a value, not a set of live DOM references: every consumer
//! re-queries through the port instead of holding handles across navigations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque reference to one element inside a specific snapshot generation.
///
/// Handles are only meaningful to the port that produced them; a handle from
/// a pre-navigation snapshot yields `PortError::NodeGone` when dispatched.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeHandle(pub u64);

/// Integer-pixel element geometry, used for candidate deduplication.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One element as observed at snapshot time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementNode {
    pub handle: NodeHandle,
    pub parent: Option<NodeHandle>,
    pub tag: String,
    pub visible_text: String,
    pub role: Option<String>,
    pub aria_label: Option<String>,
    pub id_attr: Option<String>,
    pub classes: Vec<String>,
    /// `type` attribute for inputs ("file", "submit", ...).
    pub input_type: Option<String>,
    pub bbox: BoundingBox,
    pub displayed: bool,
    pub enabled: bool,
}

impl ElementNode {
    pub fn new(handle: NodeHandle, tag: impl Into<String>) -> Self {
        Self {
            handle,
            parent: None,
            tag: tag.into(),
            visible_text: String::new(),
            role: None,
            aria_label: None,
            id_attr: None,
            classes: Vec::new(),
            input_type: None,
            bbox: BoundingBox::default(),
            displayed: true,
            enabled: true,
        }
    }

    /// Whether this node can receive a click or fill at all.
    pub fn is_interactive(&self) -> bool {
        self.displayed && self.enabled
    }

    pub fn is_form(&self) -> bool {
        self.tag.eq_ignore_ascii_case("form")
    }

    pub fn is_textarea(&self) -> bool {
        self.tag.eq_ignore_ascii_case("textarea")
    }

    pub fn is_file_input(&self) -> bool {
        self.tag.eq_ignore_ascii_case("input")
            && self
                .input_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case("file"))
    }

    /// Joined class/id haystack for keyword heuristics.
    pub fn attr_haystack(&self) -> String {
        let mut hay = self.classes.join(" ");
        if let Some(id) = &self.id_attr {
            hay.push(' ');
            hay.push_str(id);
        }
        hay.to_lowercase()
    }
}

/// Freshly queried view of the page. Never cached across calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub elements: Vec<ElementNode>,
    pub captured_at: DateTime<Utc>,
}

impl PageSnapshot {
    pub fn new(elements: Vec<ElementNode>) -> Self {
        Self {
            elements,
            captured_at: Utc::now(),
        }
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&ElementNode> {
        self.elements.iter().find(|e| e.handle == handle)
    }

    /// Walk ancestors of `handle`, nearest first.
    pub fn ancestors(&self, handle: NodeHandle) -> Vec<&ElementNode> {
        let mut chain = Vec::new();
        let mut cursor = self.get(handle).and_then(|n| n.parent);
        while let Some(parent) = cursor {
            match self.get(parent) {
                Some(node) => {
                    cursor = node.parent;
                    chain.push(node);
                }
                None => break,
            }
        }
        chain
    }

    /// True when `node` is a descendant of `scope` (or is the scope itself).
    pub fn within(&self, node: NodeHandle, scope: NodeHandle) -> bool {
        node == scope || self.ancestors(node).iter().any(|a| a.handle == scope)
    }

    pub fn form_inventory(&self) -> FormInventory {
        let mut inventory = FormInventory::default();
        for element in &self.elements {
            if element.is_form() {
                inventory.forms += 1;
            }
            if element.is_file_input() {
                inventory.file_inputs += 1;
            }
            if element.is_textarea() {
                inventory.textareas += 1;
            }
        }
        inventory
    }
}

/// Counts of application-form markers in a snapshot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FormInventory {
    pub forms: u32,
    pub file_inputs: u32,
    pub textareas: u32,
}

impl FormInventory {
    pub fn any(&self) -> bool {
        self.forms > 0 || self.file_inputs > 0 || self.textareas > 0
    }
}

/// URL and title as reported by the browser right now.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PageState {
    pub url: String,
    pub title: String,
}

impl PageState {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}
