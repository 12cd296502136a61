use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run one refresh cycle now, outside the periodic schedule.
    RefreshNow,
    /// Replace the periodic schedule.
    ScheduleAutoRefresh { interval: Duration },
    CancelAutoRefresh,
    /// Re-read configuration and push it to the engine.
    ReloadSettings,
    Shutdown,
}
