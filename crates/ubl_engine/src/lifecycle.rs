use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The host's enabled/disabled state, as seen from worker threads.
pub trait HostLifecycle: Send + Sync {
    fn is_enabled(&self) -> bool;
}

/// Shared on/off switch flipped by the host.
#[derive(Debug, Clone)]
pub struct LifecycleFlag {
    enabled: Arc<AtomicBool>,
}

impl LifecycleFlag {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}

impl Default for LifecycleFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HostLifecycle for LifecycleFlag {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}
