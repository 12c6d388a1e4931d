//! Tap dance: a key whose meaning depends on how many times, and how long, it is tapped.
//!
//! A *burst* is the run of presses on one dance key until either the tapping term passes
//! without a new press, or another key is pressed. When a burst finishes, the count of taps,
//! whether the key is still down and whether the burst was cut short are folded into a
//! [`DanceOutcome`]. The bound behavior then runs `on_finished`, and later, once the key is up,
//! `on_reset`.

use core::fmt;

use embassy_time::{Duration, Instant};
use heapless::{LinearMap, Vec};
use michele_types::action::Action;

use crate::config::TapDanceConfig;
use crate::host::Actions;

/// Result of a finished burst.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DanceOutcome {
    SingleTap = 1,
    SingleHold = 2,
    DoubleTap = 3,
    DoubleHold = 4,
    TripleTap = 5,
    TripleHold = 6,
    /// More taps than any behavior handles, no side effects
    Undefined = 8,
}

impl DanceOutcome {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Fold a burst into its outcome.
///
/// An interrupted third tap counts as a tap even if the key is still down.
pub fn classify(count: u8, pressed: bool, interrupted: bool) -> DanceOutcome {
    match count {
        1 if pressed => DanceOutcome::SingleHold,
        1 => DanceOutcome::SingleTap,
        2 if pressed => DanceOutcome::DoubleHold,
        2 => DanceOutcome::DoubleTap,
        3 if interrupted || !pressed => DanceOutcome::TripleTap,
        3 => DanceOutcome::TripleHold,
        _ => DanceOutcome::Undefined,
    }
}

/// Per dance key state of the current burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DanceState {
    /// Taps in the current burst
    pub count: u8,
    /// The dance key is down
    pub pressed: bool,
    /// Another key was pressed before the burst finished
    pub interrupted: bool,
    /// `None` until the burst finishes
    pub outcome: Option<DanceOutcome>,
    /// `on_finished` has run, `on_reset` is pending
    pub finished: bool,
    /// Time of the last press
    pub timer: Instant,
}

impl Default for DanceState {
    fn default() -> Self {
        Self {
            count: 0,
            pressed: false,
            interrupted: false,
            outcome: None,
            finished: false,
            timer: Instant::from_ticks(0),
        }
    }
}

impl DanceState {
    /// A burst is in progress or waiting for its reset
    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}

/// Keymap defined reaction to a tap dance.
///
/// `on_reset` must undo exactly the persistent effects `on_finished` had for the outcome stored
/// in [`DanceState::outcome`].
pub trait DanceBehavior {
    fn on_each_tap(&self, _state: &DanceState, _actions: &mut Actions<'_>) {}
    fn on_finished(&self, state: &DanceState, actions: &mut Actions<'_>);
    fn on_reset(&self, state: &DanceState, actions: &mut Actions<'_>);
}

/// A tap dance binding
#[derive(Clone, Copy)]
pub enum TapDance<'a> {
    /// `single` on one tap, `double` on two. The second tap finishes the burst at once.
    Double(Action, Action),
    /// `key` on one tap, move to `layer` on two. The second tap finishes the burst at once.
    LayerMove(Action, u8),
    /// Keymap defined behavior
    Advanced(&'a dyn DanceBehavior),
}

impl fmt::Debug for TapDance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapDance::Double(single, double) => f.debug_tuple("Double").field(single).field(double).finish(),
            TapDance::LayerMove(key, layer) => f.debug_tuple("LayerMove").field(key).field(layer).finish(),
            TapDance::Advanced(_) => f.write_str("Advanced"),
        }
    }
}

impl TapDance<'_> {
    fn finishes_early(&self, state: &DanceState) -> bool {
        match self {
            TapDance::Double(_, _) | TapDance::LayerMove(_, _) => state.count >= 2,
            TapDance::Advanced(_) => false,
        }
    }

    fn on_each_tap(&self, state: &DanceState, actions: &mut Actions<'_>) {
        if let TapDance::Advanced(behavior) = self {
            behavior.on_each_tap(state, actions);
        }
    }

    fn on_finished(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match *self {
            TapDance::Double(single, double) => match state.count {
                1 => actions.register_action(single),
                _ => actions.register_action(double),
            },
            TapDance::LayerMove(key, layer) => match state.count {
                1 => actions.register_action(key),
                _ => actions.layer_move(layer),
            },
            TapDance::Advanced(behavior) => behavior.on_finished(state, actions),
        }
    }

    fn on_reset(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match *self {
            TapDance::Double(single, double) => match state.count {
                1 => actions.unregister_action(single),
                _ => actions.unregister_action(double),
            },
            TapDance::LayerMove(key, _) => {
                if state.count == 1 {
                    actions.unregister_action(key);
                }
            }
            TapDance::Advanced(behavior) => behavior.on_reset(state, actions),
        }
    }
}

/// Tap dance bindings by id
pub struct TapDances<'a, const N: usize> {
    dances: LinearMap<u8, TapDance<'a>, N>,
}

impl<const N: usize> Default for TapDances<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> TapDances<'a, N> {
    pub const fn new() -> Self {
        Self { dances: LinearMap::new() }
    }

    /// Bind a dance to `id`, replacing an existing binding. Gives the dance back if the table is full.
    pub fn register(&mut self, id: u8, dance: TapDance<'a>) -> Result<(), TapDance<'a>> {
        self.dances.insert(id, dance).map(|_| ()).map_err(|(_, dance)| dance)
    }

    pub fn get(&self, id: u8) -> Option<&TapDance<'a>> {
        self.dances.get(&id)
    }

    pub fn len(&self) -> usize {
        self.dances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dances.is_empty()
    }
}

/// Burst tracking for every dance key.
pub struct TapDanceEngine<'a, const N: usize> {
    dances: TapDances<'a, N>,
    states: LinearMap<u8, DanceState, N>,
    tapping_term: Duration,
}

impl<'a, const N: usize> TapDanceEngine<'a, N> {
    pub fn new(dances: TapDances<'a, N>, config: TapDanceConfig) -> Self {
        Self {
            dances,
            states: LinearMap::new(),
            tapping_term: config.tapping_term,
        }
    }

    pub fn dances(&self) -> &TapDances<'a, N> {
        &self.dances
    }

    /// Current state of the dance `id`, neutral if it never ran
    pub fn state(&self, id: u8) -> DanceState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    /// A dance key went down
    pub fn press(&mut self, id: u8, now: Instant, actions: &mut Actions<'_>) {
        let Some(dance) = self.dances.get(id).copied() else {
            warn!("Tap dance {} is not registered", id);
            return;
        };

        // Pressing a dance key cuts every other running burst short
        self.interrupt_except(Some(id), actions);

        if self.state(id).finished {
            // Released state was never reported, tear the old burst down first
            self.reset(id, actions);
        }

        if !self.states.contains_key(&id) && self.states.insert(id, DanceState::default()).is_err() {
            warn!("Too many running tap dances, dropping press of {}", id);
            return;
        }
        let Some(state) = self.states.get_mut(&id) else {
            return;
        };
        state.count = state.count.saturating_add(1);
        state.pressed = true;
        state.timer = now;
        let state = *state;
        debug!("Tap dance {} tap #{}", id, state.count);

        dance.on_each_tap(&state, actions);
        if dance.finishes_early(&state) {
            self.finish(id, actions);
        }
    }

    /// A dance key went up
    pub fn release(&mut self, id: u8, _now: Instant, actions: &mut Actions<'_>) {
        let Some(state) = self.states.get_mut(&id) else {
            return;
        };
        state.pressed = false;
        if state.finished {
            self.reset(id, actions);
        }
    }

    /// A key other than a dance key was pressed
    pub fn interrupt(&mut self, _now: Instant, actions: &mut Actions<'_>) {
        self.interrupt_except(None, actions);
    }

    /// Finish every burst whose tapping term has passed
    pub fn tick(&mut self, now: Instant, actions: &mut Actions<'_>) {
        let expired: Vec<u8, N> = self
            .states
            .iter()
            .filter(|(_, s)| s.is_active() && !s.finished && now >= s.timer + self.tapping_term)
            .map(|(&id, _)| id)
            .collect();
        for id in expired {
            self.finish(id, actions);
            if !self.state(id).pressed {
                self.reset(id, actions);
            }
        }
    }

    /// Earliest time at which [`TapDanceEngine::tick`] has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.states
            .values()
            .filter(|s| s.is_active() && !s.finished)
            .map(|s| s.timer + self.tapping_term)
            .min()
    }

    /// A burst is running and not finished yet
    pub fn is_pending(&self) -> bool {
        self.states.values().any(|s| s.is_active() && !s.finished)
    }

    /// Interrupt every running burst but the one of `except`
    pub(crate) fn interrupt_except(&mut self, except: Option<u8>, actions: &mut Actions<'_>) {
        let running: Vec<u8, N> = self
            .states
            .iter()
            .filter(|&(&id, s)| Some(id) != except && s.is_active() && !s.finished)
            .map(|(&id, _)| id)
            .collect();
        for id in running {
            if let Some(state) = self.states.get_mut(&id) {
                state.interrupted = true;
            }
            debug!("Tap dance {} interrupted", id);
            self.finish(id, actions);
            if !self.state(id).pressed {
                self.reset(id, actions);
            }
        }
    }

    fn finish(&mut self, id: u8, actions: &mut Actions<'_>) {
        let Some(state) = self.states.get_mut(&id) else {
            return;
        };
        let outcome = classify(state.count, state.pressed, state.interrupted);
        state.outcome = Some(outcome);
        state.finished = true;
        let state = *state;
        debug!("Tap dance {} finished: {:?}", id, outcome);

        if outcome == DanceOutcome::Undefined {
            return;
        }
        if let Some(dance) = self.dances.get(id).copied() {
            dance.on_finished(&state, actions);
        }
    }

    fn reset(&mut self, id: u8, actions: &mut Actions<'_>) {
        let Some(state) = self.states.get(&id).copied() else {
            return;
        };
        if state.outcome != Some(DanceOutcome::Undefined)
            && let Some(dance) = self.dances.get(id).copied()
        {
            dance.on_reset(&state, actions);
        }
        debug!("Tap dance {} reset", id);
        self.states.remove(&id);
    }
}
