use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use triage_core::{
    ModuleId, ModuleStates, ModuleSubmissionState, RefreshController, SubmissionKind,
    TransitionError,
};

use crate::{ModuleView, Notifier, RemoteCaller};

/// Page-wide module state table, rendered through a [`ModuleView`] on every
/// change so state and affordance never diverge.
#[derive(Clone, Default)]
pub struct ModuleStateTable {
    states: Arc<Mutex<ModuleStates>>,
}

impl ModuleStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: SubmissionKind, module: &ModuleId) -> ModuleSubmissionState {
        self.lock().get(kind, module)
    }

    pub(crate) fn begin_send(
        &self,
        kind: SubmissionKind,
        module: &ModuleId,
        view: &dyn ModuleView,
    ) -> Result<(), TransitionError> {
        let rendered = self.lock().begin_send(kind, module)?;
        view.render_module(kind, module, rendered);
        Ok(())
    }

    pub(crate) fn settle(
        &self,
        kind: SubmissionKind,
        module: &ModuleId,
        state: ModuleSubmissionState,
        view: &dyn ModuleView,
    ) {
        let rendered = self.lock().set(kind, module, state);
        view.render_module(kind, module, rendered);
    }

    fn lock(&self) -> MutexGuard<'_, ModuleStates> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Collaborators shared by both submission workflows.
#[derive(Clone)]
pub struct WorkflowContext {
    pub caller: Arc<dyn RemoteCaller>,
    pub modules: Arc<dyn ModuleView>,
    pub notifier: Arc<dyn Notifier>,
    pub refresh: RefreshController,
    pub states: ModuleStateTable,
}
