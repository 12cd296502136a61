use std::time::Duration;

use crate::{BanListState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// This is the only code path that changes the active ban-list.
pub fn update(mut state: BanListState, msg: Msg) -> (BanListState, Vec<Effect>) {
    let effects = match msg {
        Msg::HostStarted { auto_refresh } => {
            if state.is_running() {
                return (state, Vec::new());
            }
            state.start(auto_refresh);
            let mut effects = vec![Effect::RefreshNow];
            if let Some(interval) = auto_refresh {
                effects.push(Effect::ScheduleAutoRefresh { interval });
            }
            effects
        }
        Msg::RefreshRequested if state.is_running() => vec![Effect::RefreshNow],
        Msg::ReloadRequested if state.is_running() => vec![Effect::ReloadSettings],
        Msg::ConfigReloaded { auto_refresh } if state.is_running() => {
            state.set_auto_refresh(auto_refresh);
            vec![schedule_effect(auto_refresh), Effect::RefreshNow]
        }
        Msg::ListFetched(list) => {
            // A cycle can finish after shutdown began; the old list stays.
            if state.is_running() {
                state.apply_list(list);
            }
            Vec::new()
        }
        Msg::CycleFinished(summary) => {
            state.record_cycle(summary);
            Vec::new()
        }
        Msg::ShutdownRequested if state.is_running() => {
            state.stop();
            vec![Effect::CancelAutoRefresh, Effect::Shutdown]
        }
        Msg::RefreshRequested
        | Msg::ReloadRequested
        | Msg::ConfigReloaded { .. }
        | Msg::ShutdownRequested
        | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn schedule_effect(auto_refresh: Option<Duration>) -> Effect {
    match auto_refresh {
        Some(interval) => Effect::ScheduleAutoRefresh { interval },
        None => Effect::CancelAutoRefresh,
    }
}
