use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use ubl_core::{CycleOutcome, PayloadSource};
use ubl_engine::{
    CycleReport, EngineConfig, EngineEvent, EngineHandle, FailureKind, LifecycleFlag, UblConfig,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(10);

/// Collect events until a cycle completes. Runs on a blocking thread so the
/// mock server keeps serving.
async fn next_cycle(engine: EngineHandle) -> (EngineHandle, Vec<EngineEvent>, CycleReport) {
    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let mut events = Vec::new();
        while started.elapsed() < WAIT {
            match engine.recv_timeout(Duration::from_millis(50)) {
                Some(EngineEvent::CycleCompleted(report)) => return (engine, events, report),
                Some(event) => events.push(event),
                None => {}
            }
        }
        panic!("no cycle completed within {WAIT:?}");
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_downloads_persists_and_reports() {
    ubl_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ubl.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("v1\nalice\nbob"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = UblConfig {
        banlist_url: format!("{}/ubl.csv", server.uri()),
        retries: 0,
        data_dir: temp.path().to_path_buf(),
        ..UblConfig::default()
    };
    let engine = EngineHandle::new(EngineConfig::from_config(
        &config,
        Arc::new(LifecycleFlag::new(true)),
    ));

    engine.refresh_now();
    let (engine, events, report) = next_cycle(engine).await;

    assert_eq!(report.source, PayloadSource::Network);
    assert_eq!(report.outcome, CycleOutcome::Applied { entries: 2 });
    match events.as_slice() {
        [EngineEvent::ListReady(list)] => {
            assert_eq!(list.header(), "v1");
            assert_eq!(list.entries(), ["alice", "bob"]);
        }
        other => panic!("unexpected events {other:?}"),
    }
    assert_eq!(
        fs::read_to_string(config.backup_path()).unwrap(),
        "v1\nalice\nbob"
    );

    // Point the engine at a dead address: the next cycle serves the backup.
    let dead = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_url = format!("http://{}/ubl.csv", dead.local_addr().unwrap());
    drop(dead);
    engine.update_settings(
        UblConfig {
            banlist_url: dead_url,
            ..config.clone()
        }
        .refresh_settings(),
    );

    engine.refresh_now();
    let (_engine, events, report) = next_cycle(engine).await;
    assert_eq!(report.source, PayloadSource::Backup);
    assert_eq!(report.failure, Some(FailureKind::Connect));
    assert!(!report.backup_saved);
    assert!(matches!(events.as_slice(), [EngineEvent::ListReady(_)]));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_url_and_missing_backup_yield_empty_cycle() {
    let temp = TempDir::new().unwrap();
    let config = UblConfig {
        data_dir: temp.path().to_path_buf(),
        ..UblConfig::default()
    };
    let engine = EngineHandle::new(EngineConfig::from_config(
        &config,
        Arc::new(LifecycleFlag::new(true)),
    ));

    engine.refresh_now();
    let (_engine, events, report) = next_cycle(engine).await;

    assert!(events.is_empty());
    assert_eq!(report.failure, Some(FailureKind::Config));
    assert_eq!(report.outcome, CycleOutcome::Empty);
    assert!(!config.backup_path().exists());
}
