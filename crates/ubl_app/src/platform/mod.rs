mod app;
mod commands;
mod config;
mod effects;
mod logging;
mod status;

pub use app::run_app;
