use anyhow::Result;

use super::protocol::WidgetCommand;
use crate::{log_debug, log_debug_content};

/// One-way delivery into an embedded execution context, identified by origin.
pub trait WidgetTransport: Send {
    fn deliver(&mut self, line: &str) -> Result<()>;
    fn origin(&self) -> &str;
}

/// Owns the (at most one) bound widget transport and serializes commands
/// into it.
pub struct EmbeddedChannel {
    transport: Option<Box<dyn WidgetTransport>>,
}

impl EmbeddedChannel {
    pub fn new() -> Self {
        Self { transport: None }
    }

    /// Record the transport once the embedded surface is up. Binding over an
    /// existing transport replaces it; the old context is gone either way.
    pub fn bind_context(&mut self, transport: Box<dyn WidgetTransport>) {
        log_debug(&format!("widget_bind|origin={}", transport.origin()));
        self.transport = Some(transport);
    }

    /// Discard the bound transport. The handle is dropped, not torn down.
    pub fn unbind(&mut self) {
        if self.transport.take().is_some() {
            log_debug("widget_unbind");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.transport.is_some()
    }

    /// Fire-and-forget delivery. With nothing bound this is a silent no-op;
    /// a failed delivery drops the dead transport and is likewise absorbed.
    pub fn send_command(&mut self, command: &WidgetCommand) {
        let Some(transport) = self.transport.as_mut() else {
            log_debug(&format!(
                "widget_send_dropped|cmd={}|reason=no_context",
                command.label()
            ));
            return;
        };
        let line = match serde_json::to_string(command) {
            Ok(line) => line,
            Err(err) => {
                log_debug(&format!(
                    "widget_send_dropped|cmd={}|reason=encode:{err}",
                    command.label()
                ));
                return;
            }
        };
        log_debug_content(&format!("widget_send|line={line}"));
        if let Err(err) = transport.deliver(&line) {
            log_debug(&format!(
                "widget_send_failed|cmd={}|origin={}|err={err:#}",
                command.label(),
                transport.origin()
            ));
            self.transport = None;
        }
    }
}

impl Default for EmbeddedChannel {
    fn default() -> Self {
        Self::new()
    }
}
