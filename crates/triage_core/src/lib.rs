//! Triage core: refresh suspension, per-module submission state and input
//! gating rules, free of any IO.
mod av;
mod error;
mod ioc;
mod module_state;
mod refresh;
mod validate;

pub use av::{classify_reply, AvReply, AV_ACCEPTED_BODY};
pub use error::TransitionError;
pub use ioc::{collect_checked, IocItem, IocModal, IocPhase, IocRow, SubmissionTarget};
pub use module_state::{
    render, send_failure_message, AffordanceView, Glyph, ModuleId, ModuleStates,
    ModuleSubmissionState, SubmissionKind,
};
pub use refresh::RefreshController;
pub use validate::{
    gate, inspect_url, normalize_for_parse, recognize_hash, Gate, HashAlgorithm, InputTab,
    UrlShape, MALFORMED_HASH_PROMPT, MALFORMED_URL_PROMPT, TRUSTED_URL_PROMPT,
};
