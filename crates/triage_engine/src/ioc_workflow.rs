use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use triage_core::{
    collect_checked, send_failure_message, IocModal, ModuleId, ModuleSubmissionState,
    SubmissionKind, SubmissionTarget, TransitionError,
};
use triage_logging::{triage_info, triage_warn};

use crate::{CallError, IocView, Notification, RemoteRequest, WorkflowContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IocOutcome {
    Sent { module: ModuleId, items: usize },
    Failed { module: ModuleId, error: CallError },
}

/// Export of selected IOCs to a module through the confirmation modal.
///
/// Refresh is suspended from [`IocWorkflow::open`] until the modal closes,
/// either through [`IocWorkflow::cancel`] or when the post from
/// [`IocWorkflow::confirm`] completes.
pub struct IocWorkflow {
    ctx: WorkflowContext,
    view: Arc<dyn IocView>,
    modal: Mutex<IocModal>,
}

impl IocWorkflow {
    pub fn new(ctx: WorkflowContext, view: Arc<dyn IocView>) -> Self {
        Self {
            ctx,
            view,
            modal: Mutex::new(IocModal::new()),
        }
    }

    pub fn open(&self, module: ModuleId, url: impl Into<String>) -> Result<(), TransitionError> {
        let target = SubmissionTarget {
            module,
            url: url.into(),
        };
        let url = target.url.clone();
        let newly_opened = self.modal().open(target)?;

        self.view.set_target_url(&url);
        if newly_opened {
            self.view.show_display(false);
            self.view.show_modal(true);
            self.ctx.refresh.suspend();
        }
        Ok(())
    }

    pub fn cancel(&self) -> Result<(), TransitionError> {
        let target = self.modal().cancel()?;
        triage_info!("IOC submission to {} cancelled", target.module);

        self.view.show_modal(false);
        self.view.show_display(true);
        self.ctx.refresh.resume();
        Ok(())
    }

    /// Posts the checked rows to the recorded module. Transport failures are
    /// reported in the outcome, not as an `Err`.
    pub async fn confirm(&self) -> Result<IocOutcome, TransitionError> {
        // The modal admits one submission at a time, so the module cannot
        // already be sending here.
        let target = self.modal().begin_send()?;
        self.ctx.states.settle(
            SubmissionKind::Ioc,
            &target.module,
            ModuleSubmissionState::Sending,
            self.ctx.modules.as_ref(),
        );
        self.view.show_loading(true);

        let items = collect_checked(&self.view.rows(), &self.view.shared_tags());
        triage_info!(
            "Sending {} IOCs to {} at {}",
            items.len(),
            target.module,
            target.url
        );

        let result = match RemoteRequest::post_json(&target.url, &items) {
            Ok(request) => self.ctx.caller.call(request).await.map(|_| ()),
            Err(err) => Err(err),
        };

        self.modal().finish()?;
        self.view.show_modal(false);
        match result {
            Ok(()) => {
                self.ctx.states.settle(
                    SubmissionKind::Ioc,
                    &target.module,
                    ModuleSubmissionState::Sent,
                    self.ctx.modules.as_ref(),
                );
                self.view.show_loading(false);
                self.view.show_display(true);
                self.ctx.refresh.resume();
                Ok(IocOutcome::Sent {
                    module: target.module,
                    items: items.len(),
                })
            }
            Err(error) => {
                triage_warn!("IOC submission to {} failed: {}", target.module, error);
                self.ctx.states.settle(
                    SubmissionKind::Ioc,
                    &target.module,
                    ModuleSubmissionState::Failed,
                    self.ctx.modules.as_ref(),
                );
                self.view.show_loading(false);
                self.view.show_display(true);
                self.ctx.refresh.resume();
                self.ctx
                    .notifier
                    .notify(Notification::danger(send_failure_message(&target.module)));
                Ok(IocOutcome::Failed {
                    module: target.module,
                    error,
                })
            }
        }
    }

    fn modal(&self) -> MutexGuard<'_, IocModal> {
        self.modal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
