//! Overlay lifecycle state machine.
//!
//! The controller owns the single overlay visibility state and is the only
//! component allowed to mutate it. Opening is gated on the asynchronous
//! microphone permission request; the outside-click monitor is armed and
//! disarmed in lock-step with visibility; the widget channel is bound only
//! while the overlay is open.

mod controller;
#[cfg(test)]
mod tests;

pub use controller::{OverlayController, OverlayState, OverlayUpdate};
