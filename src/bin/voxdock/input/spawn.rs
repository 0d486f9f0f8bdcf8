use std::thread;

use crossbeam_channel::Sender;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use voxdock::log_debug;

use super::InputEvent;

/// Read terminal events on a dedicated thread and forward the ones the event
/// loop cares about. Exits when the receiver goes away or after Exit.
pub(crate) fn spawn_input_thread(tx: Sender<InputEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                log_debug(&format!("input_read_failed|err={err}"));
                let _ = tx.send(InputEvent::Exit);
                break;
            }
        };
        let mapped = match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(InputEvent::Exit)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::Exit),
                KeyCode::Char('v') | KeyCode::Char('V') | KeyCode::Enter => {
                    Some(InputEvent::OpenAssistant)
                }
                KeyCode::Esc => Some(InputEvent::CloseOverlay),
                _ => None,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown {
                    column: mouse.column,
                    row: mouse.row,
                }),
                _ => None,
            },
            Event::Resize(cols, rows) => Some(InputEvent::Resize { cols, rows }),
            _ => None,
        };
        if let Some(mapped) = mapped {
            let is_exit = mapped == InputEvent::Exit;
            if tx.send(mapped).is_err() || is_exit {
                break;
            }
        }
    })
}
