use std::time::{Duration, Instant};

/// Spinner cadence while a permission request is pending.
const SPINNER_INTERVAL: Duration = Duration::from_millis(150);
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Transient notice text with auto-expiry, plus the opening spinner.
pub(crate) struct StatusLineState {
    notice: Option<String>,
    notice_deadline: Option<Instant>,
    spinner_index: usize,
    spinner_last_tick: Option<Instant>,
}

impl StatusLineState {
    pub(crate) fn new() -> Self {
        Self {
            notice: None,
            notice_deadline: None,
            spinner_index: 0,
            spinner_last_tick: None,
        }
    }

    pub(crate) fn set_notice(&mut self, text: impl Into<String>, ttl: Option<Duration>) {
        self.notice = Some(text.into());
        self.notice_deadline = ttl.map(|ttl| Instant::now() + ttl);
    }

    /// Drop an expired notice. Returns true when something changed.
    pub(crate) fn clear_expired(&mut self) -> bool {
        match self.notice_deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.notice = None;
                self.notice_deadline = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Advance and return the current spinner frame.
    pub(crate) fn spinner_frame(&mut self) -> &'static str {
        let now = Instant::now();
        let advance = match self.spinner_last_tick {
            Some(last) => now.duration_since(last) >= SPINNER_INTERVAL,
            None => true,
        };
        if advance {
            self.spinner_last_tick = Some(now);
            self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAMES.len();
        }
        SPINNER_FRAMES[self.spinner_index]
    }
}
