use std::sync::Arc;

use ubl_core::{parse_payload, CycleOutcome, PayloadSource};
use ubl_logging::{ubl_debug, ubl_error, ubl_info, ubl_warn};

use crate::backup::{BackupContents, BackupStore};
use crate::fetch::Fetcher;
use crate::lifecycle::HostLifecycle;
use crate::settings::{RefreshSettings, SharedSettings};
use crate::{CycleReport, EngineEvent, FailureKind, FetchError};

/// Receives engine output. Implementations forward it to the serialized host
/// context.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Something the scheduler can run on each trigger.
#[async_trait::async_trait]
pub trait RefreshTask: Send + Sync {
    async fn run_cycle(&self);
}

/// One fetch → fallback → persist → parse → apply pass.
pub struct RefreshCycle {
    fetcher: Arc<dyn Fetcher>,
    backup: BackupStore,
    settings: SharedSettings,
    lifecycle: Arc<dyn HostLifecycle>,
    sink: Arc<dyn EventSink>,
}

impl RefreshCycle {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        backup: BackupStore,
        settings: SharedSettings,
        lifecycle: Arc<dyn HostLifecycle>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            fetcher,
            backup,
            settings,
            lifecycle,
            sink,
        }
    }

    pub async fn run(&self) -> CycleReport {
        if !self.lifecycle.is_enabled() {
            ubl_debug!("Host disabled; skipping ban-list refresh");
            return self.finish(
                PayloadSource::Network,
                None,
                false,
                CycleOutcome::HostInactive,
            );
        }

        let settings = self.settings.snapshot();

        let (payload, source, failure, backup_saved) = match self.fetch_with_retries(&settings).await
        {
            Ok(payload) => {
                ubl_info!("UBL successfully updated from banlist server");
                let saved = self.save_backup(payload.clone().into_bytes()).await;
                (payload, PayloadSource::Network, None, saved)
            }
            Err(err) if err.kind.reached_stream() => {
                log_fetch_failure(&settings, &err);
                let contents = self.load_backup().await;
                // Write back the exact bytes read; an unreadable file is left alone.
                let saved = match &contents {
                    BackupContents::Present(bytes) => self.save_backup(bytes.clone()).await,
                    BackupContents::Missing => self.save_backup(Vec::new()).await,
                    BackupContents::Unreadable => {
                        ubl_warn!("Not re-saving the UBL backup because it could not be read");
                        false
                    }
                };
                (contents.text(), PayloadSource::Backup, Some(err.kind), saved)
            }
            Err(err) => {
                log_fetch_failure(&settings, &err);
                let payload = self.load_backup().await.text();
                (payload, PayloadSource::Backup, Some(err.kind), false)
            }
        };

        let outcome = if !self.lifecycle.is_enabled() {
            ubl_debug!("Host disabled while refreshing; discarding payload");
            CycleOutcome::HostInactive
        } else {
            match parse_payload(&payload) {
                Ok(list) => {
                    let entries = list.entries().len();
                    self.sink.emit(EngineEvent::ListReady(list));
                    CycleOutcome::Applied { entries }
                }
                Err(err) => {
                    ubl_warn!("Banlist is empty! ({})", err);
                    CycleOutcome::Empty
                }
            }
        };

        self.finish(source, failure, backup_saved, outcome)
    }

    fn finish(
        &self,
        source: PayloadSource,
        failure: Option<FailureKind>,
        backup_saved: bool,
        outcome: CycleOutcome,
    ) -> CycleReport {
        let report = CycleReport {
            source,
            failure,
            backup_saved,
            outcome,
        };
        self.sink.emit(EngineEvent::CycleCompleted(report.clone()));
        report
    }

    async fn fetch_with_retries(&self, settings: &RefreshSettings) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetcher.fetch(settings).await {
                Err(err) if err.kind == FailureKind::Connect && attempt < settings.retries => {
                    let delay = settings.backoff_for(attempt);
                    attempt += 1;
                    ubl_debug!(
                        "Banlist server unreachable ({}), retry {}/{} in {:?}",
                        err.message,
                        attempt,
                        settings.retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn load_backup(&self) -> BackupContents {
        let backup = self.backup.clone();
        match tokio::task::spawn_blocking(move || backup.load_raw()).await {
            Ok(contents) => contents,
            Err(err) => {
                ubl_error!(
                    "Could not load UBL backup: {}. You are running without UBL protection!",
                    err
                );
                BackupContents::Unreadable
            }
        }
    }

    async fn save_backup(&self, payload: Vec<u8>) -> bool {
        let backup = self.backup.clone();
        match tokio::task::spawn_blocking(move || backup.save_bytes(&payload)).await {
            Ok(saved) => saved,
            Err(err) => {
                ubl_error!("Failed to save UBL backup: {}", err);
                false
            }
        }
    }
}
#[async_trait::async_trait]
impl RefreshTask for RefreshCycle {
    async fn run_cycle(&self) {
        self.run().await;
    }
}

fn log_fetch_failure(settings: &RefreshSettings, err: &FetchError) {
    let url = &settings.banlist_url;
    match err.kind {
        FailureKind::Config => ubl_error!(
            "banlist-url {:?} is invalid or corrupt ({}). This must be corrected and the config reloaded before the UBL can be updated",
            url,
            err.message
        ),
        FailureKind::Connect => {
            ubl_warn!("Banlist server {} is currently unreachable: {}", url, err.message)
        }
        FailureKind::ReadTimeout => ubl_error!(
            "Timed out while waiting for banlist server {} to send data: {}",
            url,
            err.message
        ),
        FailureKind::Read => ubl_error!(
            "Connection was interrupted while downloading banlist from {}: {}",
            url,
            err.message
        ),
    }
}
