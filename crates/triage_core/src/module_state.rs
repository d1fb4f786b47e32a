use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TransitionError;

/// Short identifier of an external analysis module (IOC destination, AV engine).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Which "send to module" control a state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubmissionKind {
    Ioc,
    Antivirus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleSubmissionState {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed,
}

/// Icon shown inside the "send" affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Send,
    Spinner,
    Error,
}

/// What the page shows for one module. `send_visible` and `sent_visible` are
/// never both true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffordanceView {
    pub send_visible: bool,
    pub sent_visible: bool,
    pub glyph: Glyph,
}

/// Maps a submission state to the visible affordance.
pub fn render(state: ModuleSubmissionState) -> AffordanceView {
    match state {
        ModuleSubmissionState::Idle => AffordanceView {
            send_visible: true,
            sent_visible: false,
            glyph: Glyph::Send,
        },
        ModuleSubmissionState::Sending => AffordanceView {
            send_visible: true,
            sent_visible: false,
            glyph: Glyph::Spinner,
        },
        ModuleSubmissionState::Sent => AffordanceView {
            send_visible: false,
            sent_visible: true,
            glyph: Glyph::Send,
        },
        // Still clickable: a fresh click is the retry.
        ModuleSubmissionState::Failed => AffordanceView {
            send_visible: true,
            sent_visible: false,
            glyph: Glyph::Error,
        },
    }
}

/// Notification text for a transport failure.
pub fn send_failure_message(module: &ModuleId) -> String {
    format!("Could not send to {module}")
}

/// Page-wide table of per-module submission states. Unknown modules are Idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleStates {
    states: BTreeMap<(SubmissionKind, ModuleId), ModuleSubmissionState>,
}

impl ModuleStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: SubmissionKind, module: &ModuleId) -> ModuleSubmissionState {
        self.states
            .get(&(kind, module.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Moves a module to `Sending`. Rejected while a send for the same module
    /// is already in flight.
    pub fn begin_send(
        &mut self,
        kind: SubmissionKind,
        module: &ModuleId,
    ) -> Result<AffordanceView, TransitionError> {
        if self.get(kind, module) == ModuleSubmissionState::Sending {
            return Err(TransitionError::AlreadySending {
                module: module.clone(),
            });
        }
        Ok(self.set(kind, module, ModuleSubmissionState::Sending))
    }

    /// Records the outcome of a send and returns the view to render.
    pub fn set(
        &mut self,
        kind: SubmissionKind,
        module: &ModuleId,
        state: ModuleSubmissionState,
    ) -> AffordanceView {
        self.states.insert((kind, module.clone()), state);
        render(state)
    }
}
