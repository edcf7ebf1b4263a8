//! Process-level runtime: layered configuration, logging setup and home-dir resolution.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, AppConfigProvider, CliArgs, ClientConfig, LoggingConfig, Section};
