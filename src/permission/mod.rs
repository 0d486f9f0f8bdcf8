//! Microphone permission negotiation.
//!
//! Opening the overlay is gated on acquiring audio-capture access from the
//! host. The request runs on a worker thread and reports exactly one result
//! back over a channel, so the event loop stays responsive while the host
//! (possibly) shows its own permission prompt.

mod gate;

pub use gate::{
    list_input_devices, start_permission_job, CpalMicrophoneHost, DenialReason, MicrophoneHost,
    PermissionJob, PermissionResult,
};
