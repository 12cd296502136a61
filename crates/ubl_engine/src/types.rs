use std::fmt;

use ubl_core::{CycleOutcome, CycleSummary, ParsedList, PayloadSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A usable list was parsed; the host should make it the active list.
    ListReady(ParsedList),
    CycleCompleted(CycleReport),
}

/// Outcome of one refresh cycle as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub source: PayloadSource,
    pub failure: Option<FailureKind>,
    pub backup_saved: bool,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    pub fn summary(&self) -> CycleSummary {
        CycleSummary {
            source: self.source,
            outcome: self.outcome,
            backup_saved: self.backup_saved,
            failure: self.failure.map(|kind| kind.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// `banlist-url` is missing or not an http(s) URL. No connection was tried.
    Config,
    /// Server unreachable, too slow to answer, or answered with an error status.
    Connect,
    /// The overall deadline passed before the body was complete.
    ReadTimeout,
    /// The stream failed mid-transfer.
    Read,
}

impl FailureKind {
    /// Whether the failure happened after the response stream was open.
    ///
    /// Only those failures re-save the backup.
    pub fn reached_stream(self) -> bool {
        matches!(self, FailureKind::ReadTimeout | FailureKind::Read)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Config => write!(f, "invalid banlist-url"),
            FailureKind::Connect => write!(f, "connection failed"),
            FailureKind::ReadTimeout => write!(f, "read timed out"),
            FailureKind::Read => write!(f, "read interrupted"),
        }
    }
}
