use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use triage_core::RefreshController;
use triage_engine::{
    RefreshScheduler, RegionHost, RemoteCaller, RemoteRequest, ReqwestCaller, SnapshotPage,
};
use triage_logging::{triage_info, triage_warn};

use crate::config::ConsoleConfig;

/// Snapshot page that reports every region whose content actually changed.
pub struct ConsolePage {
    snapshot: SnapshotPage,
    updates: AtomicUsize,
}

impl ConsolePage {
    pub fn new(snapshot: SnapshotPage) -> Self {
        Self {
            snapshot,
            updates: AtomicUsize::new(0),
        }
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl RegionHost for ConsolePage {
    fn region_ids(&self, selector: &str) -> Vec<String> {
        self.snapshot.region_ids(selector)
    }

    fn replace_region(&self, id: &str, html: &str) {
        if self.snapshot.region(id).as_deref() == Some(html) {
            return;
        }
        self.snapshot.replace_region(id, html);
        self.updates.fetch_add(1, Ordering::SeqCst);
        triage_info!(
            "[{}] region {} updated ({} bytes)",
            Utc::now().to_rfc3339(),
            id,
            html.len()
        );
    }
}

/// Seeds the page from one GET, then keeps it live until `q` or Ctrl-C.
/// `p` on stdin toggles auto-refresh.
pub async fn run(config: ConsoleConfig, enabled: bool) -> Result<()> {
    let caller: Arc<dyn RemoteCaller> = Arc::new(ReqwestCaller::new(config.caller_settings()?)?);
    let initial = caller
        .call(RemoteRequest::get(&config.refresh_path))
        .await
        .with_context(|| format!("fetching {}", config.refresh_path))?;

    let page = Arc::new(ConsolePage::new(SnapshotPage::from_html(initial.body)));
    let refresh = RefreshController::with_observer(enabled, |on| {
        triage_info!("Auto-refresh {}", if on { "on" } else { "paused" });
    });
    let scheduler = RefreshScheduler::new(
        caller,
        page.clone(),
        refresh.clone(),
        config.refresh_path.clone(),
        config.interval(),
        &config.region_selector,
    );
    if scheduler.merge_set().ids().is_empty() {
        triage_warn!(
            "No region with an id matches {:?}; nothing will refresh",
            config.region_selector
        );
    }
    let handle = scheduler.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(command) => match command.trim() {
                    "p" => {
                        refresh.toggle();
                    }
                    "q" => break,
                    "" => {}
                    other => triage_warn!("Unknown command {:?} (p: pause/resume, q: quit)", other),
                },
                None => {
                    tokio::signal::ctrl_c().await?;
                    break;
                }
            },
        }
    }

    handle.abort();
    triage_info!("Stopped after {} region updates", page.updates());
    Ok(())
}
