//! Traits the engine uses to read and write the review page.
//!
//! The page (DOM, toast primitive, confirm dialog) is owned elsewhere; the
//! engine only talks to it through these seams. Implementations are expected
//! to apply each call as one atomic change.

use triage_core::{AffordanceView, InputTab, IocRow, ModuleId, SubmissionKind};

/// Periodically refreshed regions of the page.
pub trait RegionHost: Send + Sync {
    /// Ids of the regions matching `selector`, in document order.
    fn region_ids(&self, selector: &str) -> Vec<String>;
    /// Replaces the content of region `id` with `html`.
    fn replace_region(&self, id: &str, html: &str);
}

/// The IOC display and its confirmation modal.
pub trait IocView: Send + Sync {
    /// Writes the submission URL into the modal's hidden field.
    fn set_target_url(&self, url: &str);
    fn show_display(&self, visible: bool);
    fn show_modal(&self, visible: bool);
    fn show_loading(&self, visible: bool);
    /// Every selectable row, in page order.
    fn rows(&self) -> Vec<IocRow>;
    /// Content of the modal's shared tag field.
    fn shared_tags(&self) -> String;
}

/// The per-module "send"/"sent" affordances.
pub trait ModuleView: Send + Sync {
    fn render_module(&self, kind: SubmissionKind, module: &ModuleId, view: AffordanceView);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Danger,
            message: message.into(),
        }
    }
}

/// Transient toast. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Blocking yes/no question to the user.
pub trait Prompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// The analysis submission form.
pub trait SubmitForm: Send + Sync {
    /// Which input tab is currently expanded, if one that is validated.
    fn expanded_tab(&self) -> Option<InputTab>;
    fn url_input(&self) -> String;
    fn hash_input(&self) -> String;
    /// Submits the form again with validation detached.
    fn resubmit_unchecked(&self);
}

/// Small page widgets backed by a request: timeline entries and module selects.
pub trait WidgetHost: Send + Sync {
    fn remove_timeline_entry(&self, entry_id: &str);
    fn append_select_option(&self, select_id: &str, value: &str);
}
