use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use scraper::{Html, Selector};
use triage_logging::triage_warn;

use crate::RegionHost;

/// In-memory page built from one HTML snapshot, used where no live DOM exists.
///
/// Regions are captured by id the first time a selector matches them and then
/// only change through [`RegionHost::replace_region`].
#[derive(Debug, Default)]
pub struct SnapshotPage {
    document: String,
    regions: Mutex<BTreeMap<String, String>>,
}

impl SnapshotPage {
    pub fn from_html(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            regions: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn region(&self, id: &str) -> Option<String> {
        self.lock().get(id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.regions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RegionHost for SnapshotPage {
    fn region_ids(&self, selector: &str) -> Vec<String> {
        let selector = match Selector::parse(selector) {
            Ok(selector) => selector,
            Err(err) => {
                triage_warn!("Invalid region selector {:?}: {:?}", selector, err);
                return Vec::new();
            }
        };
        let doc = Html::parse_document(&self.document);
        let mut regions = self.lock();
        let mut ids = Vec::new();
        for element in doc.select(&selector) {
            if let Some(id) = element.value().id() {
                regions
                    .entry(id.to_string())
                    .or_insert_with(|| element.inner_html());
                ids.push(id.to_string());
            }
        }
        ids
    }

    fn replace_region(&self, id: &str, html: &str) {
        self.lock().insert(id.to_string(), html.to_string());
    }
}
