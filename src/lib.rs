pub mod config;
pub mod doctor;
pub mod overlay;
pub mod permission;
pub mod pointer;
pub mod terminal_restore;
pub mod widget;

mod app;
mod telemetry;

pub use app::logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use telemetry::init_tracing;
