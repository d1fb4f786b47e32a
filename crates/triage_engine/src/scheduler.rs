use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use triage_core::RefreshController;
use triage_logging::{triage_debug, triage_info, triage_warn};

use crate::{FailureKind, Fragment, RefreshMergeSet, RegionHost, RemoteCaller, RemoteRequest};

/// What one scheduler tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Refresh disabled at the top of the tick; no request issued.
    Paused,
    /// Fragment fetched and `regions` regions replaced.
    Merged { regions: usize },
    /// Refresh was disabled while the request was in flight; body dropped.
    Discarded,
    /// Request failed; the next tick is the retry.
    Failed(FailureKind),
}

/// Live-refresh poller: fetches `url` every `interval` and merges the matching
/// regions into the page unless refresh is disabled.
pub struct RefreshScheduler {
    caller: Arc<dyn RemoteCaller>,
    host: Arc<dyn RegionHost>,
    refresh: RefreshController,
    url: String,
    interval: Duration,
    merge_set: RefreshMergeSet,
}

impl RefreshScheduler {
    /// Resolves the merge set from `region_selector` against the page now; it
    /// does not change afterwards.
    pub fn new(
        caller: Arc<dyn RemoteCaller>,
        host: Arc<dyn RegionHost>,
        refresh: RefreshController,
        url: impl Into<String>,
        interval: Duration,
        region_selector: &str,
    ) -> Self {
        let merge_set = RefreshMergeSet::resolve(host.as_ref(), region_selector);
        Self {
            caller,
            host,
            refresh,
            url: url.into(),
            interval,
            merge_set,
        }
    }

    pub fn merge_set(&self) -> &RefreshMergeSet {
        &self.merge_set
    }

    /// Runs a single cycle without waiting for the interval.
    pub async fn tick(&self) -> TickOutcome {
        if !self.refresh.is_enabled() {
            return TickOutcome::Paused;
        }

        let response = match self.caller.call(RemoteRequest::get(&self.url)).await {
            Ok(response) => response,
            Err(err) => {
                triage_warn!("Refresh of {} failed: {}", self.url, err);
                return TickOutcome::Failed(err.kind);
            }
        };

        // The flag may have flipped while the request was outstanding.
        if !self.refresh.is_enabled() {
            triage_debug!("Refresh disabled mid-flight; dropping response for {}", self.url);
            return TickOutcome::Discarded;
        }

        let fragment = Fragment::parse(&response.body);
        let regions = self.merge_set.merge(&fragment, self.host.as_ref());
        TickOutcome::Merged { regions }
    }

    /// Ticks forever, one tick per interval.
    pub async fn run(self) {
        triage_info!(
            "Auto-refresh of {} every {:?} over {} regions",
            self.url,
            self.interval,
            self.merge_set.ids().len()
        );
        loop {
            tokio::time::sleep(self.interval).await;
            let outcome = self.tick().await;
            triage_debug!("Refresh tick: {:?}", outcome);
        }
    }

    /// Spawns [`RefreshScheduler::run`] on the current runtime. There is no
    /// graceful stop; disabling refresh idles the loop, aborting the handle
    /// ends it.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
