use std::collections::HashMap;

use scraper::{ElementRef, Html};

use crate::RegionHost;

/// Inner HTML of every element carrying an id in a fetched fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    regions: HashMap<String, String>,
}

impl Fragment {
    /// Parses `html`. When an id occurs twice the first element wins.
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_fragment(html);
        let mut regions = HashMap::new();
        for element in doc.root_element().descendants().filter_map(ElementRef::wrap) {
            if let Some(id) = element.value().id() {
                regions
                    .entry(id.to_string())
                    .or_insert_with(|| element.inner_html());
            }
        }
        Self { regions }
    }

    pub fn region(&self, id: &str) -> Option<&str> {
        self.regions.get(id).map(String::as_str)
    }
}

/// Region ids refreshed by a scheduler, resolved once when it starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefreshMergeSet {
    ids: Vec<String>,
}

impl RefreshMergeSet {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    pub fn resolve(host: &dyn RegionHost, selector: &str) -> Self {
        Self::new(host.region_ids(selector))
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Copies matching regions from `fragment` into the page. Ids absent from
    /// the fragment are left untouched. Returns how many regions were replaced.
    pub fn merge(&self, fragment: &Fragment, host: &dyn RegionHost) -> usize {
        let mut merged = 0;
        for id in &self.ids {
            if let Some(html) = fragment.region(id) {
                host.replace_region(id, html);
                merged += 1;
            }
        }
        merged
    }
}
