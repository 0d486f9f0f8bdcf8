use clap::Parser;
use voxdock::config::AppConfig;

/// Front-end options layered over the shared app config.
#[derive(Debug, Parser)]
#[command(about = "VoxDock landing page", author, version)]
pub(crate) struct DockConfig {
    #[command(flatten)]
    pub(crate) app: AppConfig,

    /// Render without colors
    #[arg(long = "no-color", default_value_t = false)]
    pub(crate) no_color: bool,
}
