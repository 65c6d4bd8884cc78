pub mod core;
pub mod logging;

pub use crate::core::config::{resolve_config_path, Config, ConfigError};
pub use crate::core::context::{CancelHandle, Interrupted, RunContext};
pub use crate::core::notify::{DeliveryReport, DeliveryStatus};
pub use crate::core::{exit_status, Redmine2Slack, RunError};
