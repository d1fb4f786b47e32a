use triage_core::{
    classify_reply, send_failure_message, AvReply, ModuleId, ModuleSubmissionState,
    SubmissionKind, TransitionError,
};
use triage_logging::{triage_info, triage_warn};

use crate::{CallError, Notification, RemoteRequest, WorkflowContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvOutcome {
    /// Backend answered `"ok"`.
    Sent,
    /// Backend answered with an error message; the module is clickable again.
    Rejected { message: String },
    /// Transport failure; the module shows the error glyph.
    Failed { error: CallError },
}

/// Single-click resubmission of the analysed file to an antivirus module.
pub struct AvWorkflow {
    ctx: WorkflowContext,
}

impl AvWorkflow {
    pub fn new(ctx: WorkflowContext) -> Self {
        Self { ctx }
    }

    /// Shows the spinner, posts to `url` and renders the outcome for `module`.
    /// Rejected only while a send to the same module is in flight.
    pub async fn send(&self, module: ModuleId, url: &str) -> Result<AvOutcome, TransitionError> {
        let kind = SubmissionKind::Antivirus;
        self.ctx
            .states
            .begin_send(kind, &module, self.ctx.modules.as_ref())?;
        triage_info!("Sending file to AV module {}", module);

        let outcome = match self.ctx.caller.call(RemoteRequest::post(url)).await {
            Ok(response) => match classify_reply(&response.body) {
                AvReply::Accepted => {
                    self.settle(&module, ModuleSubmissionState::Sent);
                    AvOutcome::Sent
                }
                AvReply::Rejected(message) => {
                    triage_warn!("AV module {} rejected the file: {}", module, message);
                    self.settle(&module, ModuleSubmissionState::Idle);
                    self.ctx.notifier.notify(Notification::danger(message.clone()));
                    AvOutcome::Rejected { message }
                }
            },
            Err(error) => {
                triage_warn!("AV submission to {} failed: {}", module, error);
                self.settle(&module, ModuleSubmissionState::Failed);
                self.ctx
                    .notifier
                    .notify(Notification::danger(send_failure_message(&module)));
                AvOutcome::Failed { error }
            }
        };
        Ok(outcome)
    }

    fn settle(&self, module: &ModuleId, state: ModuleSubmissionState) {
        self.ctx.states.settle(
            SubmissionKind::Antivirus,
            module,
            state,
            self.ctx.modules.as_ref(),
        );
    }
}
