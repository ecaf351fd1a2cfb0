//! Capability-based element locator with an ordered, extensible strategy
//! chain. Candidates are ranked by fixed per-strategy confidence and
//! deduplicated by geometry plus text.

pub mod errors;
pub mod resolver;
pub mod strategies;
pub mod types;

pub use errors::LocatorError;
pub use resolver::ElementLocator;
pub use strategies::{
    default_strategies, AriaLabelStrategy, ClassHeuristicStrategy, ContainerScopeStrategy,
    Strategy, TextMatchStrategy, APPLY_CLASS_KEYWORDS, APPLY_SYNONYMS,
};
pub use types::{Candidate, Intent, IntentKind, StrategyKind};
