use std::path::PathBuf;
use std::time::Duration;

use ubl_core::{Effect, Msg};
use ubl_engine::{EngineEvent, EngineHandle, LifecycleFlag};
use ubl_logging::{ubl_error, ubl_info, ubl_warn};

use super::config;

/// Carries out core effects against the engine and turns engine events back
/// into core messages.
pub struct EffectRunner {
    engine: EngineHandle,
    lifecycle: LifecycleFlag,
    config_path: PathBuf,
    data_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        lifecycle: LifecycleFlag,
        config_path: PathBuf,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            engine,
            lifecycle,
            config_path,
            data_dir,
        }
    }

    /// Runs `effects` in order. Returns follow-up messages for the core.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::RefreshNow => self.engine.refresh_now(),
                Effect::ScheduleAutoRefresh { interval } => self.engine.schedule(interval),
                Effect::CancelAutoRefresh => self.engine.cancel_schedule(),
                Effect::ReloadSettings => follow_up.extend(self.reload_settings()),
                Effect::Shutdown => {
                    // Cycles still in flight must not hand over a list after this.
                    self.lifecycle.set_enabled(false);
                }
            }
        }
        follow_up
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(event_to_msg)
    }

    pub fn try_next_msg(&self) -> Option<Msg> {
        self.engine.try_recv().map(event_to_msg)
    }

    fn reload_settings(&self) -> Option<Msg> {
        let (next, _) = match config::load_or_create(&self.config_path) {
            Ok(loaded) => loaded,
            Err(err) => {
                ubl_error!("Keeping current settings: {}", err);
                return None;
            }
        };
        if next.data_dir != self.data_dir {
            ubl_warn!(
                "data-dir changed to {:?}; it takes effect after a restart",
                next.data_dir
            );
        }
        ubl_info!("Reloaded settings from {:?}", self.config_path);
        self.engine.update_settings(next.refresh_settings());
        Some(Msg::ConfigReloaded {
            auto_refresh: next.auto_refresh(),
        })
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ListReady(list) => Msg::ListFetched(list),
        EngineEvent::CycleCompleted(report) => Msg::CycleFinished(report.summary()),
    }
}
