//! Shared primitives for the ApplyPilot engine crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Browser session identity. One session is exclusively owned by one worker.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Worker identity, one per orchestrator loop.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl WorkerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a single interaction dispatch.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Target platform label ("linkedin", "greenhouse", ...). Free-form, lowercased.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Platform(pub String);

impl Platform {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().to_lowercase())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One job posting as delivered by the upstream job source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobCandidate {
    pub title: String,
    pub company: String,
    pub url: String,
    pub platform: Platform,
}

impl JobCandidate {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        url: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            url: url.into(),
            platform,
        }
    }
}

/// Deduplication key: platform plus a normalized job identity.
///
/// This is the value the ledger enforces uniqueness on, so derivation must be
/// stable across workers and runs. URL identity (host + path, lowercased,
/// trailing slash stripped) is preferred; postings without a parseable URL
/// fall back to `company/title`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DedupKey(pub String);

impl DedupKey {
    pub fn derive(job: &JobCandidate) -> Self {
        let identity = match url::Url::parse(&job.url) {
            Ok(parsed) if parsed.host_str().is_some() => {
                let host = parsed.host_str().unwrap_or_default().to_lowercase();
                let path = parsed.path().trim_end_matches('/').to_lowercase();
                format!("{}{}", host, path)
            }
            _ => format!(
                "{}/{}",
                job.company.trim().to_lowercase(),
                job.title.trim().to_lowercase()
            ),
        };
        Self(format!("{}:{}", job.platform.0, identity))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(url: &str) -> JobCandidate {
        JobCandidate::new("Staff Engineer", "Acme", url, Platform::new("Boards"))
    }

    #[test]
    fn test_platform_lowercased() {
        assert_eq!(Platform::new("LinkedIn").0, "linkedin");
    }

    #[test]
    fn test_dedup_key_prefers_url_identity() {
        let key = DedupKey::derive(&job("https://jobs.example.com/listing/123/"));
        assert_eq!(key.as_str(), "boards:jobs.example.com/listing/123");
    }

    #[test]
    fn test_dedup_key_ignores_query_and_case() {
        let a = DedupKey::derive(&job("https://Jobs.Example.com/Listing/123?ref=email"));
        let b = DedupKey::derive(&job("https://jobs.example.com/listing/123"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_dedup_key_falls_back_to_company_title() {
        let key = DedupKey::derive(&job("not a url"));
        assert_eq!(key.as_str(), "boards:acme/staff engineer");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
        assert_ne!(ActionId::new(), ActionId::new());
    }
}
