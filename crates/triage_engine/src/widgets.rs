use std::sync::Arc;

use serde::Deserialize;
use triage_logging::{triage_debug, triage_warn};

use crate::{CallError, RemoteCaller, RemoteRequest, WidgetHost};

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Call(#[from] CallError),
    #[error("unexpected module list: {0}")]
    Body(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ModuleList {
    modules: Vec<String>,
}

/// Request-backed helpers for the timeline and module select controls.
pub struct PageWidgets {
    caller: Arc<dyn RemoteCaller>,
    host: Arc<dyn WidgetHost>,
}

impl PageWidgets {
    pub fn new(caller: Arc<dyn RemoteCaller>, host: Arc<dyn WidgetHost>) -> Self {
        Self { caller, host }
    }

    /// Deletes a timeline entry server-side, then removes it from the page.
    /// On failure the entry stays.
    pub async fn delete_timeline_entry(&self, entry_id: &str, url: &str) -> Result<(), WidgetError> {
        match self.caller.call(RemoteRequest::delete(url)).await {
            Ok(_) => {
                self.host.remove_timeline_entry(entry_id);
                Ok(())
            }
            Err(err) => {
                triage_warn!("Could not delete timeline entry {}: {}", entry_id, err);
                Err(err.into())
            }
        }
    }

    /// Fills `select_id` with the modules listed at `url`, in order. Returns
    /// how many options were appended.
    pub async fn load_module_options(&self, select_id: &str, url: &str) -> Result<usize, WidgetError> {
        let response = self.caller.call(RemoteRequest::get(url)).await?;
        let list: ModuleList = serde_json::from_str(&response.body)?;
        for module in &list.modules {
            self.host.append_select_option(select_id, module);
        }
        triage_debug!("Added {} module options to {}", list.modules.len(), select_id);
        Ok(list.modules.len())
    }
}
