//! Fixed phrase and token sets backing the verification heuristics.

/// Page text that confirms a submitted application.
pub const CONFIRMATION_PHRASES: &[&str] = &[
    "thank you for your application",
    "application successfully submitted",
    "successfully submitted",
    "application received",
    "thank you for applying",
];

/// Page text that rejects an in-flight application.
pub const REJECTION_PHRASES: &[&str] = &[
    "application could not be completed",
    "error submitting",
    "submission failed",
    "something went wrong",
];

/// URL substrings that confirm on a changed URL.
pub const URL_CONFIRM_TOKENS: &[&str] = &["thank", "confirm", "success"];

/// URL substrings that mark travel into an application flow.
pub const URL_APPLY_TOKENS: &[&str] = &["apply", "application"];

/// Title substrings that weakly mark an application flow.
pub const TITLE_APPLY_TOKENS: &[&str] = &["apply", "application"];

pub fn contains_any(haystack: &str, needles: &[&'static str]) -> Option<&'static str> {
    let lowered = haystack.to_lowercase();
    needles
        .iter()
        .find(|needle| lowered.contains(*needle))
        .copied()
}
