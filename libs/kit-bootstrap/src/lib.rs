#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Process bootstrap helpers shared by DriveHub binaries and tests:
//! layered configuration loading, logging initialization and
//! human-readable duration (de)serialization.

pub mod config;
pub mod humantime_serde;
pub mod logging;

pub use config::{ENV_PREFIX, load_section};
pub use logging::{LogFormat, LoggingConfig, init_logging};
