use std::sync::mpsc::TryRecvError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};

use crate::log_debug;
use crate::permission::{
    start_permission_job, DenialReason, MicrophoneHost, PermissionJob, PermissionResult,
};
use crate::pointer::{DismissNotice, OutsideClickMonitor, PointerEvent, Region};
use crate::widget::{EmbeddedChannel, WidgetCommand, WidgetLauncher};

/// Backlog of dismiss notices between polls; anything beyond the first for a
/// given open session is discarded as stale anyway.
const DISMISS_CHANNEL_CAPACITY: usize = 8;

/// Overlay visibility state. Owned exclusively by [`OverlayController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Opening,
    Open,
}

impl OverlayState {
    pub fn label(self) -> &'static str {
        match self {
            OverlayState::Closed => "closed",
            OverlayState::Opening => "opening",
            OverlayState::Open => "open",
        }
    }
}

/// What changed during a [`OverlayController::poll`] pass, for the
/// presentational layer's status handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayUpdate {
    /// Permission granted; the overlay is now visible.
    Opened,
    /// Permission denied; the overlay stays closed. Carries the reason for
    /// display, exactly once per failed attempt.
    Denied(DenialReason),
    /// An outside click closed the overlay.
    Dismissed,
    /// The overlay opened but the widget could not be launched; commands are
    /// no-ops until the next session.
    WidgetUnavailable(String),
}

/// State machine tying permission gating, outside-click dismissal, and the
/// widget channel together.
///
/// Single-threaded by design: one event-loop thread calls every method. The
/// only concurrency is the permission worker, polled via [`poll`].
///
/// [`poll`]: OverlayController::poll
pub struct OverlayController {
    state: OverlayState,
    /// Monotonically increasing open-attempt token. A permission result is
    /// applied only while we are still Opening for the attempt that spawned
    /// it; everything else is stale and discarded.
    attempt: u64,
    opening_started_at: Option<Instant>,
    permission_timeout: Duration,
    pub(super) pending: Vec<PermissionJob>,
    host: Arc<dyn MicrophoneHost>,
    launcher: Box<dyn WidgetLauncher>,
    pub(super) channel: EmbeddedChannel,
    pub(super) monitor: OutsideClickMonitor,
    dismiss_rx: Receiver<DismissNotice>,
    root_region: Region,
}

impl OverlayController {
    pub fn new(
        host: Arc<dyn MicrophoneHost>,
        launcher: Box<dyn WidgetLauncher>,
        permission_timeout: Duration,
    ) -> Self {
        let (dismiss_tx, dismiss_rx) = bounded(DISMISS_CHANNEL_CAPACITY);
        Self {
            state: OverlayState::Closed,
            attempt: 0,
            opening_started_at: None,
            permission_timeout,
            pending: Vec::new(),
            host,
            launcher,
            channel: EmbeddedChannel::new(),
            monitor: OutsideClickMonitor::new(dismiss_tx),
            dismiss_rx,
            root_region: Region::default(),
        }
    }

    /// Request the overlay. Starts a fresh permission request; reentrant
    /// calls while Opening or Open are no-ops.
    pub fn open(&mut self) {
        if self.state != OverlayState::Closed {
            log_debug(&format!("overlay_open_ignored|state={}", self.state.label()));
            return;
        }
        self.attempt += 1;
        self.state = OverlayState::Opening;
        self.opening_started_at = Some(Instant::now());
        log_debug(&format!("overlay_opening|attempt={}", self.attempt));
        self.pending
            .push(start_permission_job(self.host.clone(), self.attempt));
    }

    /// Close the overlay, from an explicit action or a dismiss notice; both
    /// map to the same transition. A no-op while already Closed.
    pub fn close(&mut self) {
        match self.state {
            OverlayState::Open => {
                self.state = OverlayState::Closed;
                self.monitor.disarm();
                self.channel.unbind();
                log_debug(&format!("overlay_closed|attempt={}", self.attempt));
            }
            OverlayState::Opening => {
                // Leaving Opening is what makes the in-flight permission
                // result stale; the worker itself cannot be cancelled.
                self.state = OverlayState::Closed;
                self.opening_started_at = None;
                log_debug(&format!("overlay_open_abandoned|attempt={}", self.attempt));
            }
            OverlayState::Closed => {}
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state == OverlayState::Open
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Layout feedback from the presentational layer. Safe to call every
    /// frame; an armed monitor follows the region.
    pub fn set_root_region(&mut self, region: Region) {
        self.root_region = region;
        if self.monitor.is_armed() {
            self.monitor.arm(region);
        }
    }

    /// Route one pointer event through the click monitor.
    pub fn on_pointer_down(&self, event: &PointerEvent) {
        self.monitor.observe(event);
    }

    /// Drive pending permission work and dismiss notices. Call once per
    /// event-loop tick; returns what changed so the front-end can react.
    pub fn poll(&mut self) -> Vec<OverlayUpdate> {
        let mut updates = Vec::new();
        self.poll_permission_jobs(&mut updates);
        self.check_permission_deadline(&mut updates);
        self.drain_dismiss_notices(&mut updates);
        updates
    }

    fn result_is_current(&self, job: &PermissionJob) -> bool {
        self.state == OverlayState::Opening && job.attempt == self.attempt
    }

    fn poll_permission_jobs(&mut self, updates: &mut Vec<OverlayUpdate>) {
        if self.pending.is_empty() {
            return;
        }
        let mut kept = Vec::with_capacity(self.pending.len());
        let mut resolved: Option<PermissionResult> = None;
        for mut job in std::mem::take(&mut self.pending) {
            match job.receiver.try_recv() {
                Ok(result) => {
                    // Join the worker once it reports so no handles linger.
                    if let Some(handle) = job.handle.take() {
                        let _ = handle.join();
                    }
                    if self.result_is_current(&job) {
                        resolved = Some(result);
                    } else {
                        log_debug(&format!(
                            "permission_stale|attempt={}|current={}|state={}",
                            job.attempt,
                            self.attempt,
                            self.state.label()
                        ));
                    }
                }
                Err(TryRecvError::Empty) => kept.push(job),
                Err(TryRecvError::Disconnected) => {
                    if let Some(handle) = job.handle.take() {
                        let _ = handle.join();
                    }
                    if self.result_is_current(&job) {
                        resolved = Some(PermissionResult::Denied(DenialReason::DeviceUnavailable(
                            "permission worker disconnected".into(),
                        )));
                    }
                }
            }
        }
        self.pending = kept;
        if let Some(result) = resolved {
            self.apply_permission_result(result, updates);
        }
    }

    fn apply_permission_result(
        &mut self,
        result: PermissionResult,
        updates: &mut Vec<OverlayUpdate>,
    ) {
        self.opening_started_at = None;
        match result {
            PermissionResult::Granted => {
                self.state = OverlayState::Open;
                self.monitor.arm(self.root_region);
                log_debug(&format!("overlay_open|attempt={}", self.attempt));
                updates.push(OverlayUpdate::Opened);
                match self.launcher.launch() {
                    Ok(transport) => {
                        self.channel.bind_context(transport);
                        self.channel
                            .send_command(&WidgetCommand::StartVoiceRecognition);
                    }
                    Err(err) => {
                        log_debug(&format!("widget_launch_failed|err={err:#}"));
                        updates.push(OverlayUpdate::WidgetUnavailable(format!("{err:#}")));
                    }
                }
            }
            PermissionResult::Denied(reason) => {
                self.state = OverlayState::Closed;
                log_debug(&format!(
                    "overlay_denied|attempt={}|reason={}",
                    self.attempt,
                    reason.label()
                ));
                updates.push(OverlayUpdate::Denied(reason));
            }
        }
    }

    fn check_permission_deadline(&mut self, updates: &mut Vec<OverlayUpdate>) {
        if self.state != OverlayState::Opening {
            return;
        }
        let Some(started) = self.opening_started_at else {
            return;
        };
        if started.elapsed() < self.permission_timeout {
            return;
        }
        // Invalidate the attempt so a late grant cannot resurrect the overlay.
        self.attempt += 1;
        self.state = OverlayState::Closed;
        self.opening_started_at = None;
        log_debug("overlay_denied|reason=timeout");
        updates.push(OverlayUpdate::Denied(DenialReason::Timeout));
    }

    fn drain_dismiss_notices(&mut self, updates: &mut Vec<OverlayUpdate>) {
        while let Ok(notice) = self.dismiss_rx.try_recv() {
            if self.state != OverlayState::Open {
                continue;
            }
            log_debug(&format!(
                "overlay_dismiss|column={}|row={}",
                notice.column, notice.row
            ));
            self.close();
            updates.push(OverlayUpdate::Dismissed);
        }
    }
}
