use std::time::Duration;

use crate::CycleSummary;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BanListView {
    pub running: bool,
    pub header: Option<String>,
    pub entry_count: usize,
    pub auto_refresh: Option<Duration>,
    pub last_cycle: Option<CycleSummary>,
    pub dirty: bool,
}
