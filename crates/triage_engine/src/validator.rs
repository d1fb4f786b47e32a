use std::sync::Arc;

use serde::Deserialize;
use triage_core::{gate, Gate, TRUSTED_URL_PROMPT};
use triage_logging::{triage_debug, triage_warn};

use crate::{CallError, Notification, Notifier, Prompt, RemoteCaller, RemoteRequest, SubmitForm};

/// Backend endpoint answering whether a URL points somewhere trusted.
pub const SAFETY_CHECK_PATH: &str = "/analyses/is_safe_url";

/// Result of the synchronous phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precheck {
    /// Native submit proceeds unmodified.
    Proceed,
    /// Native submit is cancelled.
    Cancel,
    /// Native submit is cancelled pending the safety check of this raw URL.
    Deferred(String),
}

/// What finally happened to one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    Proceed,
    Cancel,
    /// Held for the safety check, then resubmitted with validation detached.
    Resubmitted,
    /// Held for the safety check and never resubmitted.
    Held,
}

#[derive(Debug, thiserror::Error)]
pub enum SafetyCheckError {
    #[error("safety check request failed: {0}")]
    Call(#[from] CallError),
    #[error("unexpected safety check response: {0}")]
    Body(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SafetyVerdict {
    is_safe: bool,
}

/// Two-phase gate run on every submit of the analysis form.
pub struct InputValidator {
    caller: Arc<dyn RemoteCaller>,
    prompt: Arc<dyn Prompt>,
    notifier: Arc<dyn Notifier>,
}

impl InputValidator {
    pub fn new(
        caller: Arc<dyn RemoteCaller>,
        prompt: Arc<dyn Prompt>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            caller,
            prompt,
            notifier,
        }
    }

    /// Synchronous phase: shape checks and the malformed-input prompts.
    pub fn precheck(&self, form: &dyn SubmitForm) -> Precheck {
        match gate(form.expanded_tab(), &form.url_input(), &form.hash_input()) {
            Gate::Allow => Precheck::Proceed,
            Gate::Confirm(message) => {
                if self.prompt.confirm(message) {
                    Precheck::Proceed
                } else {
                    Precheck::Cancel
                }
            }
            Gate::SafetyCheck(url) => Precheck::Deferred(url),
        }
    }

    /// Asks the backend whether `raw_url` points to a trusted target.
    pub async fn is_safe(&self, raw_url: &str) -> Result<bool, SafetyCheckError> {
        let request = RemoteRequest::post_form(SAFETY_CHECK_PATH, &[("url", raw_url)]);
        let response = self.caller.call(request).await?;
        let verdict: SafetyVerdict = serde_json::from_str(&response.body)?;
        Ok(verdict.is_safe)
    }

    /// Runs both phases for one submit attempt.
    pub async fn on_submit(&self, form: &dyn SubmitForm) -> SubmitDecision {
        let url = match self.precheck(form) {
            Precheck::Proceed => return SubmitDecision::Proceed,
            Precheck::Cancel => return SubmitDecision::Cancel,
            Precheck::Deferred(url) => url,
        };

        match self.is_safe(&url).await {
            Ok(is_safe) => {
                triage_debug!("Safety check for {}: is_safe={}", url, is_safe);
                if !is_safe || self.prompt.confirm(TRUSTED_URL_PROMPT) {
                    form.resubmit_unchecked();
                    SubmitDecision::Resubmitted
                } else {
                    SubmitDecision::Held
                }
            }
            Err(err) => {
                triage_warn!("Safety check for {} failed: {}", url, err);
                self.notifier.notify(Notification::danger(format!(
                    "Could not check whether {url} is safe to analyze"
                )));
                SubmitDecision::Held
            }
        }
    }
}
