use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use ratatui::{backend::CrosstermBackend, Terminal};
use voxdock::overlay::{OverlayController, OverlayState, OverlayUpdate};
use voxdock::pointer::PointerEvent;

use crate::input::InputEvent;
use crate::status_line::StatusLineState;
use crate::ui;

/// Idle tick; also the spinner refresh cadence while a permission request is
/// pending.
const TICK: Duration = Duration::from_millis(50);

const NOTICE_TTL: Duration = Duration::from_secs(5);
const SHORT_NOTICE_TTL: Duration = Duration::from_secs(2);

pub(crate) fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    controller: &mut OverlayController,
    input_rx: Receiver<InputEvent>,
    no_color: bool,
) -> Result<()> {
    let mut status = StatusLineState::new();
    let mut dirty = true;

    loop {
        for update in controller.poll() {
            apply_update(&mut status, &update);
            dirty = true;
        }
        if status.clear_expired() {
            dirty = true;
        }

        match input_rx.recv_timeout(TICK) {
            Ok(InputEvent::Exit) => break,
            Ok(InputEvent::OpenAssistant) => {
                controller.open();
                dirty = true;
            }
            Ok(InputEvent::CloseOverlay) => {
                controller.close();
                dirty = true;
            }
            Ok(InputEvent::PointerDown { column, row }) => {
                controller.on_pointer_down(&PointerEvent::press(column, row));
                // Dismissal, if any, surfaces via poll() on the next pass.
                dirty = true;
            }
            Ok(InputEvent::Resize { cols, rows }) => {
                controller.set_root_region(ui::overlay_region(cols, rows));
                dirty = true;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let opening = controller.state() == OverlayState::Opening;
        if dirty || opening {
            let spinner = status.spinner_frame();
            let view = ui::ViewModel {
                overlay_visible: controller.is_visible(),
                opening,
                notice: status.notice(),
                spinner,
                no_color,
            };
            terminal.draw(|frame| ui::draw(frame, &view))?;
            dirty = false;
        }
    }
    Ok(())
}

fn apply_update(status: &mut StatusLineState, update: &OverlayUpdate) {
    match update {
        OverlayUpdate::Opened => {
            status.set_notice("Assistant ready. Speak when you are.", Some(NOTICE_TTL));
        }
        OverlayUpdate::Denied(reason) => {
            status.set_notice(reason.message(), Some(NOTICE_TTL));
        }
        OverlayUpdate::Dismissed => {
            status.set_notice("Assistant dismissed.", Some(SHORT_NOTICE_TTL));
        }
        OverlayUpdate::WidgetUnavailable(detail) => {
            status.set_notice(
                format!("Assistant widget failed to start: {detail}"),
                Some(NOTICE_TTL),
            );
        }
    }
}
