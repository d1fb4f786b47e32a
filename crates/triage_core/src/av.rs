/// Body an AV endpoint returns when the resubmission was accepted.
pub const AV_ACCEPTED_BODY: &str = "ok";

/// Application-level reading of a successful AV response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvReply {
    Accepted,
    /// Any other body is a human-readable error from the backend.
    Rejected(String),
}

pub fn classify_reply(body: &str) -> AvReply {
    if body == AV_ACCEPTED_BODY {
        AvReply::Accepted
    } else {
        AvReply::Rejected(body.to_string())
    }
}
