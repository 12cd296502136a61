use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use ubl_logging::{ubl_debug, ubl_info, ubl_warn};

use crate::refresh::RefreshTask;

/// Runs refresh cycles on demand and on a fixed period.
///
/// Holds at most one periodic trigger. At most one cycle runs at a time: a
/// trigger that arrives while a cycle is in flight is skipped.
pub struct Scheduler {
    runtime: Handle,
    task: Arc<dyn RefreshTask>,
    periodic: Option<JoinHandle<()>>,
    in_flight: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(runtime: Handle, task: Arc<dyn RefreshTask>) -> Self {
        Self {
            runtime,
            task,
            periodic: None,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the periodic trigger. The first cycle runs one `interval` from now.
    pub fn schedule_periodic(&mut self, interval: Duration) {
        self.cancel();
        if interval.is_zero() {
            ubl_warn!("Ignoring auto-refresh with a zero interval");
            return;
        }

        let runtime = self.runtime.clone();
        let task = self.task.clone();
        let in_flight = self.in_flight.clone();
        let periodic = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                spawn_cycle(&runtime, &task, &in_flight, "scheduled");
            }
        });
        self.periodic = Some(periodic);
        ubl_info!("Automatic ban-list refresh every {:?}", interval);
    }

    /// Start one cycle in the background. Returns `false` if a cycle was
    /// already running and this trigger was skipped.
    pub fn trigger_once(&self) -> bool {
        spawn_cycle(&self.runtime, &self.task, &self.in_flight, "manual")
    }

    /// Stop future periodic cycles. A cycle already running is left alone.
    pub fn cancel(&mut self) {
        if let Some(periodic) = self.periodic.take() {
            periodic.abort();
            ubl_debug!("Automatic ban-list refresh cancelled");
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.periodic.is_some()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn spawn_cycle(
    runtime: &Handle,
    task: &Arc<dyn RefreshTask>,
    in_flight: &Arc<AtomicBool>,
    trigger: &str,
) -> bool {
    if in_flight
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        ubl_info!("Skipping {} ban-list refresh: another refresh is still running", trigger);
        return false;
    }

    ubl_debug!("Starting {} ban-list refresh", trigger);
    let guard = InFlightGuard(in_flight.clone());
    let task = task.clone();
    runtime.spawn(async move {
        let _guard = guard;
        task.run_cycle().await;
    });
    true
}

/// Clears the in-flight flag when the cycle task ends, even if it is aborted.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
