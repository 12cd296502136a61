use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::Utc;
use ubl_core::{update, BanListState, Msg};
use ubl_engine::{EngineConfig, EngineHandle, LifecycleFlag};
use ubl_logging::{ubl_debug, ubl_info, ubl_warn};

use super::commands::{parse_command, Command};
use super::config::{self, ConfigOrigin, DEFAULT_CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::status;

/// How long the main loop waits on engine events before polling the console.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    let options = Options::parse(std::env::args().skip(1))?;
    let (config, origin) = config::load_or_create(&options.config_path)
        .with_context(|| "could not load configuration")?;

    let destination = if options.once {
        LogDestination::Both
    } else {
        LogDestination::File
    };
    logging::initialize(destination, &config.data_dir);
    match origin {
        ConfigOrigin::File => ubl_info!("Loaded config from {:?}", options.config_path),
        ConfigOrigin::Defaults { write_error: None } => {
            ubl_info!("Wrote default config to {:?}", options.config_path)
        }
        ConfigOrigin::Defaults {
            write_error: Some(err),
        } => ubl_warn!(
            "Using default config; could not write {:?}: {}",
            options.config_path,
            err
        ),
    }

    let lifecycle = LifecycleFlag::new(true);
    let engine = EngineHandle::new(EngineConfig::from_config(
        &config,
        Arc::new(lifecycle.clone()),
    ));
    let runner = EffectRunner::new(
        engine,
        lifecycle,
        options.config_path.clone(),
        config.data_dir.clone(),
    );
    let mut host = Host::new(runner);

    let mut input = if options.once {
        None
    } else {
        println!("Commands: refresh, reload, status, check <name>, quit");
        Some(spawn_input_reader())
    };

    let auto_refresh = if options.once {
        None
    } else {
        config.auto_refresh()
    };
    host.dispatch(Msg::HostStarted { auto_refresh });

    while host.state.is_running() {
        if let Some(rx) = &input {
            match rx.try_recv() {
                Ok(line) => host.handle_line(&line),
                Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => {
                    input = None;
                    host.dispatch(Msg::ShutdownRequested);
                    continue;
                }
            }
        }

        if let Some(msg) = host.runner.next_msg(POLL_INTERVAL) {
            host.dispatch(msg);
            while let Some(msg) = host.runner.try_next_msg() {
                host.dispatch(msg);
            }
        }

        if options.once && host.state.view().last_cycle.is_some() {
            host.dispatch(Msg::ShutdownRequested);
        }
    }

    ubl_info!("Ban-list host stopped");
    Ok(())
}

/// The serialized context: the only owner of [`BanListState`].
struct Host {
    state: BanListState,
    runner: EffectRunner,
    last_refresh_utc: Option<String>,
}

impl Host {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: BanListState::new(),
            runner,
            last_refresh_utc: None,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            if let Msg::CycleFinished(summary) = &msg {
                self.last_refresh_utc = Some(Utc::now().to_rfc3339());
                println!("Ban-list refresh: {}", status::render_cycle(summary));
            }

            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            if state.consume_dirty() {
                let view = state.view();
                ubl_debug!(
                    "Ban-list view changed: running={} entries={}",
                    view.running,
                    view.entry_count
                );
            }
            self.state = state;

            inbox.extend(self.runner.run(effects));
        }
    }

    fn handle_line(&mut self, line: &str) {
        match parse_command(line) {
            Ok(None) => {}
            Ok(Some(Command::Status)) => println!(
                "{}",
                status::render_status(&self.state.view(), self.last_refresh_utc.as_deref())
            ),
            Ok(Some(Command::Check(name))) => println!(
                "{}",
                status::render_check(&name, self.state.is_banned(&name))
            ),
            Ok(Some(command)) => {
                if let Some(msg) = command.to_msg() {
                    self.dispatch(msg);
                }
            }
            Err(err) => println!("{}", err),
        }
    }
}

fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[derive(Debug, PartialEq, Eq)]
struct Options {
    config_path: PathBuf,
    /// Run a single refresh cycle, then exit.
    once: bool,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut config_path = None;
        let mut once = false;
        for arg in args {
            match arg.as_str() {
                "--once" => once = true,
                flag if flag.starts_with("--") => bail!("unknown option {}", flag),
                path if config_path.is_none() => config_path = Some(PathBuf::from(path)),
                extra => bail!("unexpected argument {}", extra),
            }
        }
        Ok(Self {
            config_path: config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME)),
            once,
        })
    }
}
