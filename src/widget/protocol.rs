//! Wire protocol for the widget command channel.
//!
//! Commands are serialized as JSON objects with a `"cmd"` tag field, one per
//! line. The set is closed and typed; this is deliberately not an open
//! string channel.

use serde::Serialize;

/// Commands voxdock may deliver into the widget's execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "cmd")]
pub enum WidgetCommand {
    /// Tell the widget to start listening as soon as the overlay is up.
    #[serde(rename = "start_voice_recognition")]
    StartVoiceRecognition,
}

impl WidgetCommand {
    pub fn label(self) -> &'static str {
        match self {
            WidgetCommand::StartVoiceRecognition => "start_voice_recognition",
        }
    }
}
