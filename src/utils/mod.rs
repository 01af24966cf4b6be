//! Utility modules

pub mod logging;

pub use logging::{build_env_filter, init_logging, init_logging_from_config};
#[cfg(feature = "json-logging")]
pub use logging::init_json_logging;
