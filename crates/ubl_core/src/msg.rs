use std::time::Duration;

use crate::{CycleSummary, ParsedList};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host finished starting up. `None` disables automatic refresh.
    HostStarted { auto_refresh: Option<Duration> },
    /// Operator asked for an immediate update.
    RefreshRequested,
    /// Operator asked to reload the configuration file.
    ReloadRequested,
    /// Configuration was re-read after a reload request.
    ConfigReloaded { auto_refresh: Option<Duration> },
    /// Engine parsed a usable list; replaces the active one.
    ListFetched(ParsedList),
    /// Engine finished a refresh cycle, whatever its outcome.
    CycleFinished(CycleSummary),
    /// Host is going down.
    ShutdownRequested,
    NoOp,
}
