//! UBL engine: the fetch → fallback → persist → parse cycle and the worker
//! context that runs it.
mod backup;
mod decode;
mod engine;
mod fetch;
mod lifecycle;
mod persist;
mod refresh;
mod scheduler;
mod settings;
mod types;

pub use backup::{BackupContents, BackupStore};
pub use decode::decode_payload;
pub use engine::{EngineConfig, EngineHandle};
pub use fetch::{Fetcher, ReqwestFetcher};
pub use lifecycle::{HostLifecycle, LifecycleFlag};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use refresh::{ChannelEventSink, EventSink, RefreshCycle, RefreshTask};
pub use scheduler::Scheduler;
pub use settings::{
    ticks_to_duration, RefreshSettings, SharedSettings, UblConfig, BACKUP_FILENAME,
    TICKS_PER_SECOND,
};
pub use types::{CycleReport, EngineEvent, FailureKind, FetchError};
