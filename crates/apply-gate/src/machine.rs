//! The verification state machine.
//!
//! Re-evaluated once per interaction: capture a baseline before dispatch,
//! then poll page facts until a terminal verdict or the timeout. Signals are
//! checked in fixed precedence (url, dom-text, form-presence, title); the
//! first match wins each poll.

use std::time::Instant;

use browser_adapter::{PortError, Session};
use thiserror::Error;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::signals::{
    contains_any, CONFIRMATION_PHRASES, REJECTION_PHRASES, TITLE_APPLY_TOKENS, URL_APPLY_TOKENS,
    URL_CONFIRM_TOKENS,
};
use crate::types::{
    Evidence, PageBaseline, SignalKind, VerificationResult, VerifyConfig, VerifyState,
};

#[derive(Debug, Error, Clone)]
pub enum VerifyError {
    #[error("session crashed during verification: {0}")]
    SessionCrashed(String),

    /// The pre-interaction baseline could not be captured.
    #[error("baseline capture failed: {0}")]
    Baseline(String),
}

fn fatal(err: &PortError) -> Option<VerifyError> {
    if err.is_fatal() {
        Some(VerifyError::SessionCrashed(err.to_string()))
    } else {
        None
    }
}

/// Classifies whether a dispatched interaction actually landed.
pub struct VerificationEngine {
    config: VerifyConfig,
}

impl VerificationEngine {
    pub fn new(config: VerifyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Capture the pre-interaction baseline the evaluation will diff against.
    pub async fn baseline(&self, session: &Session) -> Result<PageBaseline, VerifyError> {
        // A baseline is mandatory; without the pre-interaction URL no later
        // diff is trustworthy.
        let state = session
            .port()
            .page_state()
            .await
            .map_err(|err| fatal(&err).unwrap_or_else(|| VerifyError::Baseline(err.to_string())))?;
        let forms = match session.port().snapshot().await {
            Ok(snapshot) => snapshot.form_inventory(),
            Err(err) => {
                if let Some(crash) = fatal(&err) {
                    return Err(crash);
                }
                warn!("baseline snapshot failed, assuming no forms: {}", err);
                Default::default()
            }
        };
        Ok(PageBaseline {
            url: state.url,
            title: state.title,
            forms,
        })
    }

    /// Poll until a terminal verdict or timeout.
    ///
    /// Timeout yields `Inconclusive`, never `Confirmed`: the absence of
    /// evidence is not evidence of success.
    pub async fn evaluate(
        &self,
        session: &Session,
        baseline: &PageBaseline,
    ) -> Result<VerificationResult, VerifyError> {
        let deadline = Instant::now() + Duration::from_millis(self.config.timeout_ms);
        let poll = Duration::from_millis(self.config.poll_interval_ms.max(1));
        let mut state = VerifyState::Unknown;

        loop {
            if let Some(verdict) = self.poll_once(session, baseline, &mut state).await? {
                info!(verdict = ?verdict, "verification terminal");
                return Ok(verdict);
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            sleep(poll.min(deadline - now)).await;
        }

        debug!(last_state = ?state, "verification timed out");
        Ok(VerificationResult::Inconclusive)
    }

    /// One pass over the signals. `None` means keep polling.
    async fn poll_once(
        &self,
        session: &Session,
        baseline: &PageBaseline,
        state: &mut VerifyState,
    ) -> Result<Option<VerificationResult>, VerifyError> {
        let page = match session.port().page_state().await {
            Ok(page) => page,
            Err(err) => {
                if let Some(crash) = fatal(&err) {
                    return Err(crash);
                }
                warn!("verification poll skipped: {}", err);
                return Ok(None);
            }
        };

        // 1. URL signal.
        let url_changed = page.url != baseline.url;
        if url_changed {
            if contains_any(&page.url, URL_CONFIRM_TOKENS).is_some() {
                *state = VerifyState::Confirmed;
                return Ok(Some(VerificationResult::Confirmed(Evidence::new(
                    SignalKind::Url,
                    page.url.clone(),
                ))));
            }
            if contains_any(&page.url, URL_APPLY_TOKENS).is_some()
                && matches!(*state, VerifyState::Unknown)
            {
                debug!(url = %page.url, "travelled into application flow");
                *state = VerifyState::Navigating;
            }
        }

        // 2. DOM-text signal.
        match session.port().page_text().await {
            Ok(text) => {
                if let Some(phrase) = contains_any(&text, CONFIRMATION_PHRASES) {
                    *state = VerifyState::Confirmed;
                    return Ok(Some(VerificationResult::Confirmed(Evidence::new(
                        SignalKind::DomText,
                        phrase,
                    ))));
                }
                if !matches!(*state, VerifyState::Unknown) {
                    if let Some(phrase) = contains_any(&text, REJECTION_PHRASES) {
                        *state = VerifyState::Rejected;
                        return Ok(Some(VerificationResult::Rejected {
                            reason: phrase.to_string(),
                        }));
                    }
                }
            }
            Err(err) => {
                if let Some(crash) = fatal(&err) {
                    return Err(crash);
                }
                warn!("page text unavailable this poll: {}", err);
            }
        }

        // 3. Form-presence signal.
        match session.port().snapshot().await {
            Ok(snapshot) => {
                let forms = snapshot.form_inventory();
                let appeared = forms.any() && !baseline.forms.any();
                match *state {
                    VerifyState::Unknown | VerifyState::Navigating if appeared => {
                        debug!(?forms, "application form appeared");
                        *state = VerifyState::FormDetected;
                    }
                    VerifyState::FormDetected if !forms.any() => {
                        // The form we saw is gone again: most likely submitted.
                        debug!("detected form disappeared");
                        *state = VerifyState::SubmissionSent;
                    }
                    _ => {}
                }
            }
            Err(err) => {
                if let Some(crash) = fatal(&err) {
                    return Err(crash);
                }
                warn!("snapshot unavailable this poll: {}", err);
            }
        }

        // 4. Title signal (weak).
        if matches!(*state, VerifyState::Unknown)
            && page.title != baseline.title
            && contains_any(&page.title, TITLE_APPLY_TOKENS).is_some()
        {
            debug!(title = %page.title, "title suggests application flow");
            *state = VerifyState::FormDetected;
        }

        Ok(None)
    }
}

impl Default for VerificationEngine {
    fn default() -> Self {
        Self::new(VerifyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use browser_adapter::{
        BrowserPort, ElementNode, NodeHandle, PageSnapshot, PageState, SessionConfig,
    };
    use std::sync::Arc;
    use std::sync::Mutex;

    /// One scripted view of the page per poll; the last view repeats.
    #[derive(Clone, Default)]
    struct PageView {
        url: String,
        title: String,
        text: String,
        with_form: bool,
    }

    struct ScriptedPort {
        views: Mutex<Vec<PageView>>,
    }

    impl ScriptedPort {
        fn new(views: Vec<PageView>) -> Self {
            Self {
                views: Mutex::new(views),
            }
        }

        fn current(&self) -> PageView {
            let views = self.views.lock().unwrap();
            views.first().cloned().unwrap_or_default()
        }

        fn advance(&self) {
            let mut views = self.views.lock().unwrap();
            if views.len() > 1 {
                views.remove(0);
            }
        }
    }

    #[async_trait]
    impl BrowserPort for ScriptedPort {
        async fn navigate(&self, _url: &str) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
        async fn snapshot(&self) -> Result<PageSnapshot, browser_adapter::PortError> {
            let view = self.current();
            // snapshot is the last per-poll read; move the script forward.
            self.advance();
            let elements = if view.with_form {
                vec![ElementNode::new(NodeHandle(1), "form")]
            } else {
                vec![]
            };
            Ok(PageSnapshot::new(elements))
        }
        async fn page_state(&self) -> Result<PageState, browser_adapter::PortError> {
            let view = self.current();
            Ok(PageState::new(view.url, view.title))
        }
        async fn page_text(&self) -> Result<String, browser_adapter::PortError> {
            Ok(self.current().text)
        }
        async fn scroll_into_view(&self, _n: NodeHandle) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
        async fn click(&self, _n: NodeHandle) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
        async fn dispatch_click_event(
            &self,
            _n: NodeHandle,
        ) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
        async fn invoke_click(&self, _n: NodeHandle) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
        async fn pointer_click(&self, _n: NodeHandle) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
        async fn fill_native(
            &self,
            _n: NodeHandle,
            _v: &str,
        ) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
        async fn fill_scripted(
            &self,
            _n: NodeHandle,
            _v: &str,
        ) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
        async fn press_escape(&self) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
        async fn hide_node(&self, _n: NodeHandle) -> Result<(), browser_adapter::PortError> {
            Ok(())
        }
    }

    fn engine() -> VerificationEngine {
        VerificationEngine::new(VerifyConfig {
            timeout_ms: 80,
            poll_interval_ms: 5,
        })
    }

    fn baseline_at(url: &str, title: &str) -> PageBaseline {
        PageBaseline {
            url: url.to_string(),
            title: title.to_string(),
            forms: Default::default(),
        }
    }

    fn session(views: Vec<PageView>) -> Session {
        Session::new(SessionConfig::default(), Arc::new(ScriptedPort::new(views)))
    }

    #[tokio::test]
    async fn test_unchanged_page_is_inconclusive_never_confirmed() {
        let view = PageView {
            url: "https://jobs.example.com/listing/1".into(),
            title: "Staff Engineer".into(),
            text: "Some listing copy".into(),
            with_form: false,
        };
        let session = session(vec![view.clone()]);
        let baseline = baseline_at(&view.url, &view.title);

        let verdict = engine().evaluate(&session, &baseline).await.unwrap();
        assert_eq!(verdict, VerificationResult::Inconclusive);
    }

    #[tokio::test]
    async fn test_confirmation_text_confirms_with_dom_evidence() {
        let view = PageView {
            url: "https://jobs.example.com/listing/1".into(),
            title: "Staff Engineer".into(),
            text: "Thank you for your application — we'll be in touch.".into(),
            with_form: false,
        };
        let session = session(vec![view.clone()]);
        let baseline = baseline_at(&view.url, &view.title);

        match engine().evaluate(&session, &baseline).await.unwrap() {
            VerificationResult::Confirmed(evidence) => {
                assert_eq!(evidence.kind, SignalKind::DomText);
                assert_eq!(evidence.value, "thank you for your application");
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_changed_confirmation_url_wins_over_text() {
        let view = PageView {
            url: "https://jobs.example.com/apply/thank-you".into(),
            title: "Thanks".into(),
            text: "Application received".into(),
            with_form: false,
        };
        let session = session(vec![view]);
        let baseline = baseline_at("https://jobs.example.com/listing/1", "Staff Engineer");

        match engine().evaluate(&session, &baseline).await.unwrap() {
            VerificationResult::Confirmed(evidence) => {
                assert_eq!(evidence.kind, SignalKind::Url);
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_form_flow_then_rejection_text_rejects() {
        let listing = PageView {
            url: "https://jobs.example.com/apply/1".into(),
            title: "Apply".into(),
            text: "Fill in the form".into(),
            with_form: true,
        };
        let failed = PageView {
            text: "Something went wrong. Try again later.".into(),
            ..listing.clone()
        };
        let session = session(vec![listing, failed]);
        let baseline = baseline_at("https://jobs.example.com/listing/1", "Staff Engineer");

        match engine().evaluate(&session, &baseline).await.unwrap() {
            VerificationResult::Rejected { reason } => {
                assert_eq!(reason, "something went wrong");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_form_detected_without_terminal_stays_inconclusive() {
        let view = PageView {
            url: "https://jobs.example.com/apply/1".into(),
            title: "Apply here".into(),
            text: "Upload your resume".into(),
            with_form: true,
        };
        let session = session(vec![view]);
        let baseline = baseline_at("https://jobs.example.com/listing/1", "Staff Engineer");

        let verdict = engine().evaluate(&session, &baseline).await.unwrap();
        assert_eq!(verdict, VerificationResult::Inconclusive);
    }
}
