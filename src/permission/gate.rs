use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait};

use crate::log_debug;

/// Outcome of a single microphone permission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionResult {
    Granted,
    Denied(DenialReason),
}

/// Why a permission request failed. Denial is recoverable and is never
/// escalated past the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// No input device is present, or the requested device does not exist.
    NoInputDevice,
    /// A device exists but could not be opened for capture.
    DeviceUnavailable(String),
    /// The host never answered within the configured deadline.
    Timeout,
}

impl DenialReason {
    pub fn label(&self) -> &'static str {
        match self {
            DenialReason::NoInputDevice => "no_input_device",
            DenialReason::DeviceUnavailable(_) => "device_unavailable",
            DenialReason::Timeout => "timeout",
        }
    }

    /// Short notice text for the status line.
    pub fn message(&self) -> String {
        match self {
            DenialReason::NoInputDevice => "Microphone unavailable: no input device found.".into(),
            DenialReason::DeviceUnavailable(detail) => {
                format!("Microphone unavailable: {detail}")
            }
            DenialReason::Timeout => "Microphone permission request timed out.".into(),
        }
    }
}

/// Seam to the host audio stack. The production implementation talks to CPAL;
/// tests substitute scripted hosts.
pub trait MicrophoneHost: Send + Sync {
    /// Acquire audio-capture access. May block on a host-level prompt; called
    /// on a worker thread, at most one prompt per invocation.
    fn request_access(&self) -> PermissionResult;
}

/// Requests capture access by resolving and opening the configured input
/// device. Opening the device is what triggers the OS permission prompt on
/// hosts that have one.
pub struct CpalMicrophoneHost {
    preferred_device: Option<String>,
}

impl CpalMicrophoneHost {
    pub fn new(preferred_device: Option<String>) -> Self {
        Self { preferred_device }
    }

    fn resolve_device(&self) -> Result<cpal::Device, DenialReason> {
        let host = cpal::default_host();
        match self.preferred_device.as_deref() {
            Some(name) => {
                let mut devices = host
                    .input_devices()
                    .map_err(|err| DenialReason::DeviceUnavailable(err.to_string()))?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or(DenialReason::NoInputDevice)
            }
            None => host.default_input_device().ok_or(DenialReason::NoInputDevice),
        }
    }
}

impl MicrophoneHost for CpalMicrophoneHost {
    fn request_access(&self) -> PermissionResult {
        let device = match self.resolve_device() {
            Ok(device) => device,
            Err(reason) => return PermissionResult::Denied(reason),
        };
        // Asking for the default input config is the cheapest operation that
        // forces the host to surface its capture-permission state.
        match device.default_input_config() {
            Ok(config) => {
                log_debug(&format!(
                    "mic_access|device={}|rate={}",
                    device.name().unwrap_or_else(|_| "unknown".into()),
                    config.sample_rate().0
                ));
                PermissionResult::Granted
            }
            Err(err) => PermissionResult::Denied(DenialReason::DeviceUnavailable(err.to_string())),
        }
    }
}

/// List microphone names so the CLI can expose a human-friendly selector.
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host.input_devices().context("no input devices available")?;
    let mut names = Vec::new();
    for device in devices {
        if let Ok(name) = device.name() {
            names.push(name);
        }
    }
    Ok(names)
}

/// Handle the overlay controller uses to poll the worker thread for a result.
pub struct PermissionJob {
    pub(crate) receiver: mpsc::Receiver<PermissionResult>,
    pub(crate) handle: Option<thread::JoinHandle<()>>,
    /// Open attempt this request belongs to; results for other attempts are stale.
    pub(crate) attempt: u64,
}

/// Spawn a worker thread that performs one permission request and sends back
/// exactly one result.
pub fn start_permission_job(host: Arc<dyn MicrophoneHost>, attempt: u64) -> PermissionJob {
    let (tx, rx) = mpsc::sync_channel(1);

    let handle = thread::spawn(move || {
        let started = Instant::now();
        let result = host.request_access();
        log_debug(&format!(
            "permission_result|attempt={attempt}|outcome={}|wait_ms={}",
            match &result {
                PermissionResult::Granted => "granted",
                PermissionResult::Denied(reason) => reason.label(),
            },
            started.elapsed().as_millis()
        ));
        // The controller may have moved on; a closed channel is not an error.
        let _ = tx.send(result);
    });

    PermissionJob {
        receiver: rx,
        handle: Some(handle),
        attempt,
    }
}
