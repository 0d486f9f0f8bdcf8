use anyhow::{bail, Result};

use super::{AppConfig, MAX_PERMISSION_TIMEOUT_MS, MIN_PERMISSION_TIMEOUT_MS};

impl AppConfig {
    /// Reject values that would break the widget subprocess or the event loop.
    pub fn validate(&self) -> Result<()> {
        if self.widget_cmd.trim().is_empty() {
            bail!("--widget-cmd must not be empty");
        }
        if self.widget_origin.trim().is_empty() {
            bail!("--widget-origin must not be empty");
        }
        // The origin is embedded in log lines and the wire protocol; keep it one token.
        if self.widget_origin.chars().any(char::is_whitespace) {
            bail!("--widget-origin must not contain whitespace");
        }
        if self.permission_timeout_ms < MIN_PERMISSION_TIMEOUT_MS
            || self.permission_timeout_ms > MAX_PERMISSION_TIMEOUT_MS
        {
            bail!(
                "--permission-timeout-ms must be between {MIN_PERMISSION_TIMEOUT_MS} and {MAX_PERMISSION_TIMEOUT_MS}"
            );
        }
        if let Some(device) = &self.input_device {
            if device.trim().is_empty() {
                bail!("--input-device must not be empty when provided");
            }
        }
        Ok(())
    }
}
