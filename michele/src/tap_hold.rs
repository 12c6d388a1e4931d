//! Tap-hold (mod-tap and layer-tap) keys.
//!
//! While a tap-hold key is undecided, every other key event is held back. Releasing the key
//! before `hold_timeout` makes it a tap, otherwise it is a hold. Either way the held back events
//! are replayed afterwards, in order.

use embassy_time::{Duration, Instant};
use heapless::{Deque, Vec};
use michele_types::action::Action;

use crate::config::TapHoldConfig;
use crate::event::{KeyEvent, KeyPos};

/// Max number of events held back while a tap-hold key is undecided
pub const TAP_HOLD_BUFFER_SIZE: usize = 8;
/// Max number of tap-hold keys held at the same time, enough for every mod-tap key of a layer
pub const TAP_HOLD_MAX_HELD: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingTapHold {
    pub pos: KeyPos,
    pub tap: Action,
    pub hold: Action,
    pub pressed_at: Instant,
}

/// What the keyboard does with an event that arrives while a key is undecided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapHoldDecision {
    /// No tap-hold key is pending, process the event as usual
    Ignore,
    /// Event held back
    Buffer,
    /// The pending key was released in time, tap it and replay
    Tap(Action),
    /// The buffer is full: resolve the pending key as hold, replay, then process the event
    Hold(Action),
}

pub struct TapHold {
    pending: Option<PendingTapHold>,
    buffer: Deque<KeyEvent, TAP_HOLD_BUFFER_SIZE>,
    /// Resolved holds, released with their key
    held: Vec<(KeyPos, Action), TAP_HOLD_MAX_HELD>,
    hold_timeout: Duration,
}

impl TapHold {
    pub fn new(config: TapHoldConfig) -> Self {
        Self {
            pending: None,
            buffer: Deque::new(),
            held: Vec::new(),
            hold_timeout: config.hold_timeout,
        }
    }

    pub fn pending(&self) -> Option<&PendingTapHold> {
        self.pending.as_ref()
    }

    /// A tap-hold key went down
    pub(crate) fn start(&mut self, pos: KeyPos, tap: Action, hold: Action, now: Instant) {
        debug!("Tap-hold pending at {:?}", pos);
        self.pending = Some(PendingTapHold {
            pos,
            tap,
            hold,
            pressed_at: now,
        });
    }

    /// Feed an event while a key may be pending
    pub(crate) fn on_event(&mut self, event: KeyEvent) -> TapHoldDecision {
        let Some(pending) = self.pending else {
            return TapHoldDecision::Ignore;
        };

        if event.pos == pending.pos && !event.pressed {
            debug!("Tap-hold {:?} tapped", pending.pos);
            self.pending = None;
            return TapHoldDecision::Tap(pending.tap);
        }

        if self.buffer.push_back(event).is_err() {
            warn!("Tap-hold buffer full, resolving {:?} as hold", pending.pos);
            return TapHoldDecision::Hold(self.resolve_hold(pending));
        }
        TapHoldDecision::Buffer
    }

    /// Resolve the pending key as hold once `hold_timeout` passed
    pub(crate) fn timeout(&mut self, now: Instant) -> Option<Action> {
        let pending = self.pending?;
        if now < pending.pressed_at + self.hold_timeout {
            return None;
        }
        debug!("Tap-hold {:?} held", pending.pos);
        Some(self.resolve_hold(pending))
    }

    /// A hold that can't be released with its key is dropped
    fn resolve_hold(&mut self, pending: PendingTapHold) -> Action {
        self.pending = None;
        if self.held.push((pending.pos, pending.hold)).is_err() {
            warn!("Too many tap-hold keys held, dropping {:?}", pending.hold);
            return Action::No;
        }
        pending.hold
    }

    /// The hold action to release when the key at `pos` goes up
    pub(crate) fn take_hold(&mut self, pos: KeyPos) -> Option<Action> {
        let idx = self.held.iter().position(|(p, _)| *p == pos)?;
        Some(self.held.swap_remove(idx).1)
    }

    /// Held back events, oldest first
    pub(crate) fn take_buffer(&mut self) -> Deque<KeyEvent, TAP_HOLD_BUFFER_SIZE> {
        core::mem::replace(&mut self.buffer, Deque::new())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.pressed_at + self.hold_timeout)
    }
}
