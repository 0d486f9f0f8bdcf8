use std::io::Write;
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{Context, Result};

use super::channel::WidgetTransport;
use crate::config::AppConfig;
use crate::log_debug;

/// Launches a fresh widget context. The controller calls this once per
/// granted open attempt; tests substitute recording launchers.
pub trait WidgetLauncher: Send {
    fn launch(&self) -> Result<Box<dyn WidgetTransport>>;
}

/// Widget subprocess with a piped stdin carrying the command stream.
pub struct ProcessTransport {
    child: Child,
    stdin: ChildStdin,
    origin: String,
}

impl WidgetTransport for ProcessTransport {
    fn deliver(&mut self, line: &str) -> Result<()> {
        self.stdin
            .write_all(line.as_bytes())
            .and_then(|_| self.stdin.write_all(b"\n"))
            .and_then(|_| self.stdin.flush())
            .with_context(|| format!("widget '{}' rejected command delivery", self.origin))
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}

impl Drop for ProcessTransport {
    fn drop(&mut self) {
        // The hosting surface is gone; reap the child so it cannot linger.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawns the configured widget command with stdin piped and output discarded.
pub struct ProcessWidgetLauncher {
    command: String,
    args: Vec<String>,
    origin: String,
}

impl ProcessWidgetLauncher {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            command: config.widget_cmd.clone(),
            args: config.widget_args.clone(),
            origin: config.widget_origin.clone(),
        }
    }
}

impl WidgetLauncher for ProcessWidgetLauncher {
    fn launch(&self) -> Result<Box<dyn WidgetTransport>> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to launch widget command '{}'", self.command))?;
        let stdin = child
            .stdin
            .take()
            .context("widget child has no stdin handle")?;
        log_debug(&format!(
            "widget_launch|cmd={}|origin={}|pid={}",
            self.command,
            self.origin,
            child.id()
        ));
        Ok(Box::new(ProcessTransport {
            child,
            stdin,
            origin: self.origin.clone(),
        }))
    }
}
