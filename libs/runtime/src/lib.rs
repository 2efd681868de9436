//! Process-level plumbing shared by the userdesk binaries: layered
//! configuration, logging setup and home directory resolution.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    default_logging_config, AppConfig, AppSection, CliArgs, LoggingConfig, Section, DIRECTORY_MODULE,
    ENV_PREFIX,
};
pub use paths::home_dir::{resolve_home_dir, HomeDirError};
