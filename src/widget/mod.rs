//! One-way command channel into the embedded assistant widget.
//!
//! The widget is an opaque external collaborator: voxdock launches it as a
//! subprocess and only ever sends newline-delimited JSON commands to its
//! stdin, identified by a configured origin. Nothing is read back.
//!
//! Sending with no context bound is a silent no-op by contract, never a
//! fault; the widget may simply not be there yet (or anymore).

mod channel;
mod process;
mod protocol;

pub use channel::{EmbeddedChannel, WidgetTransport};
pub use process::{ProcessTransport, ProcessWidgetLauncher, WidgetLauncher};
pub use protocol::WidgetCommand;
