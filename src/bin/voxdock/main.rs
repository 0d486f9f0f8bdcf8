//! VoxDock entrypoint: a landing page that opens an embedded voice-assistant
//! widget inside an overlay, gated on microphone permission.
//!
//! # Architecture
//!
//! - Input thread: reads terminal events, forwards typed input events
//! - Event loop: drives the overlay controller and redraws the page
//! - Permission worker: one short-lived thread per open attempt
//! - Widget subprocess: receives one-way JSON commands on stdin

mod config;
mod event_loop;
mod input;
mod status_line;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::bounded;
use crossterm::terminal::size as terminal_size;
use ratatui::{backend::CrosstermBackend, Terminal};
use voxdock::doctor::doctor_report;
use voxdock::overlay::OverlayController;
use voxdock::permission::{self, CpalMicrophoneHost};
use voxdock::terminal_restore::TerminalRestoreGuard;
use voxdock::widget::ProcessWidgetLauncher;
use voxdock::{init_logging, init_tracing, log_debug, log_file_path};

use crate::config::DockConfig;
use crate::event_loop::run_event_loop;
use crate::input::spawn_input_thread;

/// Max pending input events before backpressure.
const INPUT_CHANNEL_CAPACITY: usize = 256;

fn main() -> Result<()> {
    let config = DockConfig::parse();

    if config.app.list_input_devices {
        for name in permission::list_input_devices()? {
            println!("{name}");
        }
        return Ok(());
    }
    if config.app.doctor {
        println!("{}", doctor_report(&config.app).render());
        return Ok(());
    }

    config.app.validate()?;
    init_logging(&config.app);
    init_tracing(&config.app);
    log_debug("=== VoxDock started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));

    let host = Arc::new(CpalMicrophoneHost::new(config.app.input_device.clone()));
    let launcher = Box::new(ProcessWidgetLauncher::from_config(&config.app));
    let mut controller = OverlayController::new(
        host,
        launcher,
        Duration::from_millis(config.app.permission_timeout_ms),
    );

    let terminal_guard = TerminalRestoreGuard::new();
    let mut stdout = io::stdout();
    terminal_guard.claim(&mut stdout)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    if let Ok((cols, rows)) = terminal_size() {
        controller.set_root_region(ui::overlay_region(cols, rows));
    }

    let (input_tx, input_rx) = bounded(INPUT_CHANNEL_CAPACITY);
    let _input_handle = spawn_input_thread(input_tx);

    let result = run_event_loop(&mut terminal, &mut controller, input_rx, config.no_color);

    drop(terminal);
    terminal_guard.restore();
    log_debug("=== VoxDock exiting ===");
    result
}
