use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use ubl_logging::{ubl_debug, ubl_error};

use crate::backup::BackupStore;
use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::lifecycle::HostLifecycle;
use crate::refresh::{ChannelEventSink, RefreshCycle};
use crate::scheduler::Scheduler;
use crate::settings::{RefreshSettings, SharedSettings, UblConfig};
use crate::EngineEvent;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

enum EngineCommand {
    RefreshNow,
    Schedule(Duration),
    CancelSchedule,
    UpdateSettings(RefreshSettings),
}

pub struct EngineConfig {
    pub settings: RefreshSettings,
    pub backup_path: PathBuf,
    pub lifecycle: Arc<dyn HostLifecycle>,
}

impl EngineConfig {
    pub fn from_config(config: &UblConfig, lifecycle: Arc<dyn HostLifecycle>) -> Self {
        Self {
            settings: config.refresh_settings(),
            backup_path: config.backup_path(),
            lifecycle,
        }
    }
}

/// Background worker context.
///
/// A dedicated thread hosts the tokio runtime that runs fetches, backup I/O
/// and timers. Commands go in over a channel; [`EngineEvent`]s come back over
/// another, to be applied by the host's serialized context. Dropping the
/// handle stops the thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_fetcher(config, Arc::new(ReqwestFetcher::new()))
    }

    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("ubl-engine".into())
            .spawn(move || run_engine(config, fetcher, cmd_rx, event_tx));
        if let Err(err) = spawned {
            ubl_error!("Could not start the ban-list engine thread: {}", err);
        }

        Self { cmd_tx, event_rx }
    }

    pub fn refresh_now(&self) {
        self.send(EngineCommand::RefreshNow);
    }

    pub fn schedule(&self, interval: Duration) {
        self.send(EngineCommand::Schedule(interval));
    }

    pub fn cancel_schedule(&self) {
        self.send(EngineCommand::CancelSchedule);
    }

    /// Settings used by cycles that start after this call.
    pub fn update_settings(&self, settings: RefreshSettings) {
        self.send(EngineCommand::UpdateSettings(settings));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            ubl_error!("Ban-list engine is not running; command dropped");
        }
    }
}

fn run_engine(
    config: EngineConfig,
    fetcher: Arc<dyn Fetcher>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("ubl-worker")
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            ubl_error!("Could not start the ban-list worker runtime: {}", err);
            return;
        }
    };

    let settings = SharedSettings::new(config.settings);
    let cycle = RefreshCycle::new(
        fetcher,
        BackupStore::new(config.backup_path),
        settings.clone(),
        config.lifecycle,
        Arc::new(ChannelEventSink::new(event_tx)),
    );
    let mut scheduler = Scheduler::new(runtime.handle().clone(), Arc::new(cycle));

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::RefreshNow => {
                scheduler.trigger_once();
            }
            EngineCommand::Schedule(interval) => scheduler.schedule_periodic(interval),
            EngineCommand::CancelSchedule => scheduler.cancel(),
            EngineCommand::UpdateSettings(next) => settings.replace(next),
        }
    }

    ubl_debug!("Ban-list engine shutting down");
    drop(scheduler);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}
