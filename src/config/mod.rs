//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::{ArgAction, Parser};

pub use defaults::{
    DEFAULT_PERMISSION_TIMEOUT_MS, DEFAULT_WIDGET_CMD, DEFAULT_WIDGET_ORIGIN,
    MAX_PERMISSION_TIMEOUT_MS, MIN_PERMISSION_TIMEOUT_MS,
};

/// CLI options for the voxdock landing page. Validated values keep the widget
/// subprocess invocation safe.
#[derive(Debug, Parser, Clone)]
#[command(about = "VoxDock landing page", author, version)]
pub struct AppConfig {
    /// Command used to launch the embedded assistant widget
    #[arg(long = "widget-cmd", env = "VOXDOCK_WIDGET_CMD", default_value = DEFAULT_WIDGET_CMD)]
    pub widget_cmd: String,

    /// Extra arguments to pass to the widget command (repeatable)
    #[arg(long = "widget-arg", action = ArgAction::Append, value_name = "ARG", allow_hyphen_values = true)]
    pub widget_args: Vec<String>,

    /// Origin tag identifying the widget's execution context
    #[arg(long = "widget-origin", env = "VOXDOCK_WIDGET_ORIGIN", default_value = DEFAULT_WIDGET_ORIGIN)]
    pub widget_origin: String,

    /// Preferred audio input device name
    #[arg(long)]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Print environment diagnostics and exit
    #[arg(long = "doctor", default_value_t = false)]
    pub doctor: bool,

    /// Give up on a pending microphone permission request after this long (milliseconds)
    #[arg(
        long = "permission-timeout-ms",
        default_value_t = DEFAULT_PERMISSION_TIMEOUT_MS
    )]
    pub permission_timeout_ms: u64,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "VOXDOCK_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "VOXDOCK_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging widget command payloads (debug log only)
    #[arg(
        long = "log-content",
        env = "VOXDOCK_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,

    /// Enable verbose timing logs
    #[arg(long)]
    pub log_timings: bool,
}
