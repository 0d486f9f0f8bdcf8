use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::anyhow;

use super::*;
use crate::permission::{DenialReason, MicrophoneHost, PermissionResult};
use crate::pointer::{PointerEvent, Region};
use crate::widget::{WidgetLauncher, WidgetTransport};

/// Host whose answer is scripted; with a gate, the worker blocks until the
/// test releases it, which lets tests resolve permission after the user has
/// already backed out.
struct ScriptedHost {
    result: PermissionResult,
    gate: Option<Mutex<mpsc::Receiver<()>>>,
    requests: AtomicUsize,
}

impl ScriptedHost {
    fn immediate(result: PermissionResult) -> Arc<Self> {
        Arc::new(Self {
            result,
            gate: None,
            requests: AtomicUsize::new(0),
        })
    }

    fn gated(result: PermissionResult) -> (Arc<Self>, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (
            Arc::new(Self {
                result,
                gate: Some(Mutex::new(rx)),
                requests: AtomicUsize::new(0),
            }),
            tx,
        )
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl MicrophoneHost for ScriptedHost {
    fn request_access(&self) -> PermissionResult {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let gate = gate.lock().unwrap_or_else(|e| e.into_inner());
            let _ = gate.recv_timeout(Duration::from_secs(2));
        }
        self.result.clone()
    }
}

struct RecordingTransport {
    lines: Arc<Mutex<Vec<String>>>,
}

impl WidgetTransport for RecordingTransport {
    fn deliver(&mut self, line: &str) -> anyhow::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line.to_string());
        Ok(())
    }

    fn origin(&self) -> &str {
        "assistant.test"
    }
}

#[derive(Clone)]
struct RecordingLauncher {
    lines: Arc<Mutex<Vec<String>>>,
    launches: Arc<AtomicUsize>,
    fail: bool,
}

impl RecordingLauncher {
    fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
            launches: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    fn sent_lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl WidgetLauncher for RecordingLauncher {
    fn launch(&self) -> anyhow::Result<Box<dyn WidgetTransport>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("widget binary missing"));
        }
        Ok(Box::new(RecordingTransport {
            lines: self.lines.clone(),
        }))
    }
}

const ROOT: Region = Region {
    x: 10,
    y: 5,
    width: 40,
    height: 12,
};

fn controller_with(
    host: Arc<ScriptedHost>,
    launcher: RecordingLauncher,
    timeout: Duration,
) -> OverlayController {
    let mut controller = OverlayController::new(host, Box::new(launcher), timeout);
    controller.set_root_region(ROOT);
    controller
}

/// Poll until the predicate holds or a generous deadline expires, collecting
/// every update along the way.
fn poll_until(
    controller: &mut OverlayController,
    pred: impl Fn(&OverlayController) -> bool,
) -> Vec<OverlayUpdate> {
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut updates = Vec::new();
    loop {
        updates.extend(controller.poll());
        if pred(controller) || Instant::now() >= deadline {
            return updates;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

fn assert_lock_step(controller: &OverlayController) {
    assert_eq!(
        controller.monitor.is_armed(),
        controller.state() == OverlayState::Open,
        "click subscription must track visibility (state={})",
        controller.state().label()
    );
}

#[test]
fn granted_open_arms_monitor_and_starts_the_widget() {
    let host = ScriptedHost::immediate(PermissionResult::Granted);
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host, launcher.clone(), Duration::from_secs(5));

    assert!(!controller.is_visible());
    controller.open();
    assert_eq!(controller.state(), OverlayState::Opening);
    assert!(!controller.is_visible(), "no visual change while opening");

    let updates = poll_until(&mut controller, |c| c.is_visible());
    assert_eq!(controller.state(), OverlayState::Open);
    assert_lock_step(&controller);
    assert_eq!(
        updates
            .iter()
            .filter(|u| matches!(u, OverlayUpdate::Opened))
            .count(),
        1
    );
    assert_eq!(launcher.launch_count(), 1);
    assert_eq!(
        launcher.sent_lines(),
        [r#"{"cmd":"start_voice_recognition"}"#]
    );
    assert!(controller.channel.is_bound());
}

#[test]
fn denied_open_stays_closed_and_surfaces_one_notice() {
    let host = ScriptedHost::immediate(PermissionResult::Denied(DenialReason::NoInputDevice));
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host, launcher.clone(), Duration::from_secs(5));

    controller.open();
    let updates = poll_until(&mut controller, |c| {
        c.state() == OverlayState::Closed && c.pending.is_empty()
    });

    assert_eq!(controller.state(), OverlayState::Closed);
    assert!(!controller.is_visible());
    assert_lock_step(&controller);
    assert_eq!(
        updates,
        [OverlayUpdate::Denied(DenialReason::NoInputDevice)],
        "exactly one denial notice"
    );
    assert_eq!(launcher.launch_count(), 0);
    assert!(launcher.sent_lines().is_empty());
}

#[test]
fn outside_click_dismisses_exactly_once() {
    let host = ScriptedHost::immediate(PermissionResult::Granted);
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host, launcher, Duration::from_secs(5));
    controller.open();
    poll_until(&mut controller, |c| c.is_visible());

    // Two outside presses before the next poll still close only once.
    controller.on_pointer_down(&PointerEvent::press(0, 0));
    controller.on_pointer_down(&PointerEvent::press(60, 2));
    let updates = controller.poll();

    assert_eq!(updates, [OverlayUpdate::Dismissed]);
    assert_eq!(controller.state(), OverlayState::Closed);
    assert_lock_step(&controller);
    assert!(!controller.channel.is_bound());
}

#[test]
fn inside_click_keeps_the_overlay_open() {
    let host = ScriptedHost::immediate(PermissionResult::Granted);
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host, launcher, Duration::from_secs(5));
    controller.open();
    poll_until(&mut controller, |c| c.is_visible());

    controller.on_pointer_down(&PointerEvent::press(ROOT.x + 1, ROOT.y + 1));
    let updates = controller.poll();

    assert!(updates.is_empty());
    assert_eq!(controller.state(), OverlayState::Open);
    assert_lock_step(&controller);
}

#[test]
fn reentrant_open_requests_permission_once() {
    let (host, release) = ScriptedHost::gated(PermissionResult::Granted);
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host.clone(), launcher.clone(), Duration::from_secs(5));

    controller.open();
    controller.open();
    controller.open();
    assert_eq!(controller.state(), OverlayState::Opening);

    release.send(()).expect("worker should be waiting");
    poll_until(&mut controller, |c| c.is_visible());

    assert_eq!(host.request_count(), 1, "one request in flight per attempt");
    assert_eq!(launcher.launch_count(), 1);

    // Opening again while already Open is also a no-op.
    controller.open();
    assert_eq!(host.request_count(), 1);
}

#[test]
fn stale_grant_cannot_resurrect_a_dismissed_overlay() {
    let (host, release) = ScriptedHost::gated(PermissionResult::Granted);
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host, launcher.clone(), Duration::from_secs(5));

    controller.open();
    assert_eq!(controller.state(), OverlayState::Opening);
    controller.close();
    assert_eq!(controller.state(), OverlayState::Closed);

    release.send(()).expect("worker should be waiting");
    let updates = poll_until(&mut controller, |c| c.pending.is_empty());

    assert_eq!(controller.state(), OverlayState::Closed);
    assert!(updates.is_empty(), "stale grant must not surface anything");
    assert_lock_step(&controller);
    assert_eq!(launcher.launch_count(), 0);
}

#[test]
fn reopening_after_an_abandoned_attempt_requests_again() {
    let (host, release) = ScriptedHost::gated(PermissionResult::Granted);
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host.clone(), launcher.clone(), Duration::from_secs(5));

    controller.open();
    controller.close();
    controller.open();

    // First release resolves the stale attempt, second the live one.
    release.send(()).expect("first worker should be waiting");
    release.send(()).expect("second worker should be waiting");
    poll_until(&mut controller, |c| c.is_visible());

    assert_eq!(controller.state(), OverlayState::Open);
    assert_eq!(host.request_count(), 2, "no caching across attempts");
    assert_eq!(launcher.launch_count(), 1, "only the live attempt launches");
}

#[test]
fn unanswered_permission_request_times_out_closed() {
    let (host, _release) = ScriptedHost::gated(PermissionResult::Granted);
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host, launcher.clone(), Duration::from_millis(50));

    controller.open();
    thread::sleep(Duration::from_millis(80));
    let updates = controller.poll();

    assert_eq!(updates, [OverlayUpdate::Denied(DenialReason::Timeout)]);
    assert_eq!(controller.state(), OverlayState::Closed);
    assert_lock_step(&controller);
    assert_eq!(launcher.launch_count(), 0);
}

#[test]
fn widget_launch_failure_leaves_the_overlay_usable() {
    let host = ScriptedHost::immediate(PermissionResult::Granted);
    let launcher = RecordingLauncher::failing();
    let mut controller = controller_with(host, launcher.clone(), Duration::from_secs(5));

    controller.open();
    let updates = poll_until(&mut controller, |c| c.is_visible());

    assert_eq!(controller.state(), OverlayState::Open);
    assert_lock_step(&controller);
    assert!(!controller.channel.is_bound());
    assert!(updates.contains(&OverlayUpdate::Opened));
    assert!(updates
        .iter()
        .any(|u| matches!(u, OverlayUpdate::WidgetUnavailable(_))));

    // Close still tears down cleanly with nothing bound.
    controller.close();
    assert_eq!(controller.state(), OverlayState::Closed);
    assert_lock_step(&controller);
}

#[test]
fn invalid_transitions_are_no_ops() {
    let host = ScriptedHost::immediate(PermissionResult::Granted);
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host.clone(), launcher, Duration::from_secs(5));

    // close while Closed
    controller.close();
    assert_eq!(controller.state(), OverlayState::Closed);
    assert!(controller.poll().is_empty());
    assert_eq!(host.request_count(), 0);
    assert_lock_step(&controller);
}

#[test]
fn resize_updates_the_armed_region() {
    let host = ScriptedHost::immediate(PermissionResult::Granted);
    let launcher = RecordingLauncher::new();
    let mut controller = controller_with(host, launcher, Duration::from_secs(5));
    controller.open();
    poll_until(&mut controller, |c| c.is_visible());

    let moved = Region::new(0, 0, 5, 5);
    controller.set_root_region(moved);

    // A press inside the old region but outside the new one now dismisses.
    controller.on_pointer_down(&PointerEvent::press(ROOT.x + 1, ROOT.y + 1));
    let updates = controller.poll();
    assert_eq!(updates, [OverlayUpdate::Dismissed]);
    assert_eq!(controller.state(), OverlayState::Closed);
}
