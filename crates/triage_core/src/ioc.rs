use serde::ser::Serializer;
use serde::Serialize;

use crate::{ModuleId, TransitionError};

/// One selectable row of the IOC submission table as read from the page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IocRow {
    pub checked: bool,
    pub value: String,
    pub sources: String,
    pub tags: String,
}

/// An indicator as posted to a module.
///
/// `tags` holds the row's tag field followed by the modal's shared tag field;
/// on the wire they are joined with a literal comma, so an empty shared field
/// leaves a trailing comma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IocItem {
    pub value: String,
    pub sources: String,
    #[serde(serialize_with = "serialize_joined")]
    pub tags: Vec<String>,
}

impl IocItem {
    pub fn new(
        value: impl Into<String>,
        sources: impl Into<String>,
        row_tags: impl Into<String>,
        shared_tags: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            sources: sources.into(),
            tags: vec![row_tags.into(), shared_tags.into()],
        }
    }
}

fn serialize_joined<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&tags.join(","))
}

/// Builds the items to post from the checked rows, in page order.
pub fn collect_checked(rows: &[IocRow], shared_tags: &str) -> Vec<IocItem> {
    rows.iter()
        .filter(|row| row.checked)
        .map(|row| IocItem::new(&row.value, &row.sources, &row.tags, shared_tags))
        .collect()
}

/// Module and endpoint an IOC submission is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTarget {
    pub module: ModuleId,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IocPhase {
    #[default]
    Closed,
    AwaitingConfirm(SubmissionTarget),
    Sending(SubmissionTarget),
}

/// Phase tracker for the IOC confirmation modal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IocModal {
    phase: IocPhase,
}

impl IocModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &IocPhase {
        &self.phase
    }

    /// Opens the modal for `target`. Returns `false` when the modal was
    /// already awaiting confirmation and has only been re-targeted.
    pub fn open(&mut self, target: SubmissionTarget) -> Result<bool, TransitionError> {
        match &self.phase {
            IocPhase::Sending(current) => Err(TransitionError::IocInFlight {
                module: current.module.clone(),
            }),
            IocPhase::AwaitingConfirm(_) => {
                self.phase = IocPhase::AwaitingConfirm(target);
                Ok(false)
            }
            IocPhase::Closed => {
                self.phase = IocPhase::AwaitingConfirm(target);
                Ok(true)
            }
        }
    }

    pub fn cancel(&mut self) -> Result<SubmissionTarget, TransitionError> {
        match std::mem::take(&mut self.phase) {
            IocPhase::AwaitingConfirm(target) => Ok(target),
            other => {
                let err = in_flight_or_closed(&other);
                self.phase = other;
                Err(err)
            }
        }
    }

    pub fn begin_send(&mut self) -> Result<SubmissionTarget, TransitionError> {
        match std::mem::take(&mut self.phase) {
            IocPhase::AwaitingConfirm(target) => {
                self.phase = IocPhase::Sending(target.clone());
                Ok(target)
            }
            other => {
                let err = in_flight_or_closed(&other);
                self.phase = other;
                Err(err)
            }
        }
    }

    /// Closes the modal once the post has completed, whatever its outcome.
    pub fn finish(&mut self) -> Result<SubmissionTarget, TransitionError> {
        match std::mem::take(&mut self.phase) {
            IocPhase::Sending(target) => Ok(target),
            other => {
                self.phase = other;
                Err(TransitionError::ModalNotOpen)
            }
        }
    }
}

fn in_flight_or_closed(phase: &IocPhase) -> TransitionError {
    match phase {
        IocPhase::Sending(target) => TransitionError::IocInFlight {
            module: target.module.clone(),
        },
        _ => TransitionError::ModalNotOpen,
    }
}
