//! Default values shared between CLI definitions and validation.

/// Command launched inside the overlay when permission is granted.
pub const DEFAULT_WIDGET_CMD: &str = "assistant-widget";

/// Origin tag stamped onto the widget command channel.
pub const DEFAULT_WIDGET_ORIGIN: &str = "assistant.local";

/// How long a pending microphone permission request may stay unresolved.
pub const DEFAULT_PERMISSION_TIMEOUT_MS: u64 = 10_000;

pub const MIN_PERMISSION_TIMEOUT_MS: u64 = 250;
pub const MAX_PERMISSION_TIMEOUT_MS: u64 = 120_000;
