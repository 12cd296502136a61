use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The host scheduler runs at 20 ticks per second; intervals and deadlines in
/// the configuration are expressed in that unit.
pub const TICKS_PER_SECOND: u64 = 20;

const TICKS_PER_MINUTE: u64 = TICKS_PER_SECOND * 60;

pub const BACKUP_FILENAME: &str = "ubl.backup";

pub fn ticks_to_duration(ticks: u64) -> Duration {
    Duration::from_millis(ticks.saturating_mul(1000) / TICKS_PER_SECOND)
}

/// User-facing configuration, as stored in the host's config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UblConfig {
    pub banlist_url: String,
    /// Extra attempts after a connection failure.
    pub retries: u32,
    /// Soft read-rate ceiling in KB/s; sets the read chunk size.
    pub max_bandwidth: u32,
    /// Seconds allowed for connecting, for the response head, and for the body.
    pub timeout: u32,
    /// Minutes between automatic refreshes; 0 disables them.
    pub auto_check_interval: u32,
    pub data_dir: PathBuf,
}

impl Default for UblConfig {
    fn default() -> Self {
        Self {
            banlist_url: String::new(),
            retries: 3,
            max_bandwidth: 64,
            timeout: 5,
            auto_check_interval: 10,
            data_dir: PathBuf::from("."),
        }
    }
}

impl UblConfig {
    pub fn backup_path(&self) -> PathBuf {
        self.data_dir.join(BACKUP_FILENAME)
    }

    pub fn auto_refresh(&self) -> Option<Duration> {
        match self.auto_check_interval {
            0 => None,
            minutes => Some(ticks_to_duration(
                u64::from(minutes).saturating_mul(TICKS_PER_MINUTE),
            )),
        }
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        let timeout = Duration::from_secs(u64::from(self.timeout));
        let chunk_size = (self.max_bandwidth as usize).saturating_mul(1024) / TICKS_PER_SECOND as usize;
        RefreshSettings {
            banlist_url: self.banlist_url.clone(),
            retries: self.retries,
            retry_backoff: RefreshSettings::DEFAULT_RETRY_BACKOFF,
            chunk_size: chunk_size.max(1),
            connect_timeout: timeout,
            read_timeout: timeout,
            deadline: ticks_to_duration(u64::from(self.timeout).saturating_mul(TICKS_PER_SECOND)),
        }
    }
}

/// Everything one refresh cycle needs, resolved to concrete units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSettings {
    pub banlist_url: String,
    pub retries: u32,
    /// Delay before the first retry; doubles on each further attempt.
    pub retry_backoff: Duration,
    pub chunk_size: usize,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Upper bound on the whole fetch, enforced while the body is read.
    pub deadline: Duration,
}

impl RefreshSettings {
    pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);
    const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(60);

    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(Self::MAX_RETRY_BACKOFF)
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        UblConfig::default().refresh_settings()
    }
}

/// Settings shared between the host and running cycles.
///
/// Each cycle takes a snapshot at its start, so a reload never changes a
/// cycle that is already running.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<RefreshSettings>>,
}

impl SharedSettings {
    pub fn new(settings: RefreshSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn snapshot(&self) -> RefreshSettings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn replace(&self, settings: RefreshSettings) {
        match self.inner.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }
}
