//! Triage engine: HTTP calls and the async workflows that drive the review
//! page through its collaborator traits.
mod av_workflow;
mod caller;
mod decode;
mod fragment;
mod ioc_workflow;
mod page;
mod scheduler;
mod snapshot;
mod types;
mod validator;
mod widgets;
mod workflow;

pub use av_workflow::{AvOutcome, AvWorkflow};
pub use caller::{CallerSettings, RemoteCaller, ReqwestCaller};
pub use decode::decode_body;
pub use fragment::{Fragment, RefreshMergeSet};
pub use ioc_workflow::{IocOutcome, IocWorkflow};
pub use page::{
    IocView, ModuleView, Notification, NotificationLevel, Notifier, Prompt, RegionHost,
    SubmitForm, WidgetHost,
};
pub use scheduler::{RefreshScheduler, TickOutcome};
pub use snapshot::SnapshotPage;
pub use types::{CallError, FailureKind, HttpMethod, RemoteRequest, RemoteResponse, RequestBody};
pub use validator::{InputValidator, Precheck, SafetyCheckError, SubmitDecision, SAFETY_CHECK_PATH};
pub use widgets::{PageWidgets, WidgetError};
pub use workflow::{ModuleStateTable, WorkflowContext};
