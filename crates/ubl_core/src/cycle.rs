/// Where the payload of a refresh cycle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    Network,
    Backup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A list with `entries` entries was handed to the host.
    Applied { entries: usize },
    /// The payload had no usable list; the active list was kept.
    Empty,
    /// The host was disabled before the list could be applied.
    HostInactive,
}

/// Host-side record of one finished refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub source: PayloadSource,
    pub outcome: CycleOutcome,
    pub backup_saved: bool,
    /// Display text of the fetch failure, if the network fetch failed.
    pub failure: Option<String>,
}
