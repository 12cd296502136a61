use std::collections::HashSet;
use std::time::Duration;

use crate::view_model::BanListView;
use crate::{CycleSummary, ParsedList};

/// Consumer-side ban-list state.
///
/// Owned by the serialized context; only [`crate::update`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BanListState {
    running: bool,
    header: Option<String>,
    entries: Vec<String>,
    lookup: HashSet<String>,
    auto_refresh: Option<Duration>,
    last_cycle: Option<CycleSummary>,
    dirty: bool,
}

impl BanListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> BanListView {
        BanListView {
            running: self.running,
            header: self.header.clone(),
            entry_count: self.entries.len(),
            auto_refresh: self.auto_refresh,
            last_cycle: self.last_cycle.clone(),
            dirty: self.dirty,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Case-insensitive membership test against the active list.
    pub fn is_banned(&self, name: &str) -> bool {
        self.lookup.contains(&name.trim().to_lowercase())
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Replace the active list wholesale.
    pub fn set_list(&mut self, header: String, entries: Vec<String>) {
        self.lookup = entries
            .iter()
            .map(|entry| entry.trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        self.header = Some(header);
        self.entries = entries;
        self.dirty = true;
    }

    pub(crate) fn apply_list(&mut self, list: ParsedList) {
        let (header, entries) = list.into_parts();
        self.set_list(header, entries);
    }

    pub(crate) fn start(&mut self, auto_refresh: Option<Duration>) {
        self.running = true;
        self.auto_refresh = auto_refresh;
        self.dirty = true;
    }

    pub(crate) fn stop(&mut self) {
        self.running = false;
        self.auto_refresh = None;
        self.dirty = true;
    }

    pub(crate) fn set_auto_refresh(&mut self, auto_refresh: Option<Duration>) {
        if self.auto_refresh != auto_refresh {
            self.auto_refresh = auto_refresh;
            self.dirty = true;
        }
    }

    pub(crate) fn record_cycle(&mut self, summary: CycleSummary) {
        self.last_cycle = Some(summary);
        self.dirty = true;
    }
}
