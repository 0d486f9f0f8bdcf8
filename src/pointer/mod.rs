//! Outside-click dismissal.
//!
//! While the overlay is open, a single armed observation tests every
//! pointer-down event against the overlay root region and notifies its
//! subscriber when the press lands outside it. Arming and disarming are
//! explicit lifecycle operations driven by the overlay state machine, so
//! there is never a hidden listener left behind.


use crossbeam_channel::Sender;

use crate::log_debug;

/// Rectangular screen region in cell coordinates (0-based, half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && column < self.x.saturating_add(self.width)
            && row >= self.y
            && row < self.y.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Press,
    Release,
}

/// A pointer event as delivered by the input thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub column: u16,
    pub row: u16,
}

impl PointerEvent {
    pub fn press(column: u16, row: u16) -> Self {
        Self {
            kind: PointerEventKind::Press,
            column,
            row,
        }
    }
}

/// Emitted to the subscriber for every outside press observed while armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissNotice {
    pub column: u16,
    pub row: u16,
}

/// Observes pointer-down events against a root region while armed.
///
/// At most one observation is active at a time: arming while armed replaces
/// the region without creating a second observation, and disarming while
/// inactive is a no-op. Pairing of arm/disarm is the caller's job.
pub struct OutsideClickMonitor {
    subscriber: Sender<DismissNotice>,
    region: Option<Region>,
}

impl OutsideClickMonitor {
    pub fn new(subscriber: Sender<DismissNotice>) -> Self {
        Self {
            subscriber,
            region: None,
        }
    }

    pub fn arm(&mut self, region: Region) {
        if self.region.is_some() {
            log_debug("click_monitor|rearm");
        }
        self.region = Some(region);
    }

    pub fn disarm(&mut self) {
        self.region = None;
    }

    pub fn is_armed(&self) -> bool {
        self.region.is_some()
    }

    /// Test one event. Emits one notice per outside press and stays armed
    /// until explicitly disarmed.
    pub fn observe(&self, event: &PointerEvent) {
        if event.kind != PointerEventKind::Press {
            return;
        }
        let Some(region) = self.region else {
            return;
        };
        if region.contains(event.column, event.row) {
            return;
        }
        // A full queue or a dropped receiver means the subscriber is gone;
        // there is nobody left to dismiss for.
        let _ = self.subscriber.try_send(DismissNotice {
            column: event.column,
            row: event.row,
        });
    }
}
