//! One-shot modifiers and layers.
//!
//! [`OneShot`] only tracks state. Each transition returns what the caller has to undo or
//! register, the caller applies it through [`crate::host::Actions`].

use embassy_time::{Duration, Instant};
use heapless::Vec;
use michele_types::keycode::KeyCode;
use michele_types::modifier::ModifierCombination;

use crate::config::OneShotConfig;

/// Keys that can hold modifiers from a consumed single one-shot at the same time
pub(crate) const ONESHOT_MAX_CONSUMERS: usize = 6;

/// State machine for one shot keys
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OneShotState<T> {
    /// One shot key is still pressed
    Initial(T),
    /// One shot key was released before any other key, normal one shot behavior
    Single(T),
    /// Another key was pressed before one shot key was released, treat as a normal modifier/layer
    Held(T),
    /// One shot inactive
    #[default]
    None,
}

impl<T> OneShotState<T> {
    /// Get the current one shot value if any
    pub fn value(&self) -> Option<&T> {
        match self {
            OneShotState::Initial(v) | OneShotState::Single(v) | OneShotState::Held(v) => Some(v),
            OneShotState::None => None,
        }
    }
}

pub struct OneShot {
    mods: OneShotState<ModifierCombination>,
    mods_since: Instant,
    /// Keys that consumed a single one-shot and are still down, with the modifiers they got
    applied: Vec<(KeyCode, ModifierCombination), ONESHOT_MAX_CONSUMERS>,
    layer: OneShotState<u8>,
    layer_since: Instant,
    timeout: Duration,
}

impl OneShot {
    pub fn new(config: OneShotConfig) -> Self {
        Self {
            mods: OneShotState::None,
            mods_since: Instant::from_ticks(0),
            applied: Vec::new(),
            layer: OneShotState::None,
            layer_since: Instant::from_ticks(0),
            timeout: config.timeout,
        }
    }

    pub fn mods(&self) -> OneShotState<ModifierCombination> {
        self.mods
    }

    pub fn layer(&self) -> OneShotState<u8> {
        self.layer
    }

    /// A one-shot modifier key went down
    pub(crate) fn press_mods(&mut self, new_mods: ModifierCombination, now: Instant) {
        self.mods = match self.mods {
            OneShotState::None => OneShotState::Initial(new_mods),
            OneShotState::Initial(m) => OneShotState::Initial(m | new_mods),
            OneShotState::Single(m) => OneShotState::Single(m | new_mods),
            OneShotState::Held(m) => OneShotState::Held(m | new_mods),
        };
        self.mods_since = now;
    }

    /// Arm one-shot modifiers for the next key, without a key being held
    pub(crate) fn set_mods(&mut self, new_mods: ModifierCombination, now: Instant) {
        let current = self.mods.value().copied().unwrap_or_default();
        self.mods = OneShotState::Single(current | new_mods);
        self.mods_since = now;
    }

    /// The one-shot modifier key went up. Returns modifiers to unregister.
    pub(crate) fn release_mods(&mut self, now: Instant) -> Option<ModifierCombination> {
        match self.mods {
            OneShotState::Initial(m) => {
                self.mods = OneShotState::Single(m);
                self.mods_since = now;
                None
            }
            OneShotState::Held(m) => {
                self.mods = OneShotState::None;
                Some(m)
            }
            _ => None,
        }
    }

    /// A non-modifier keycode is about to be registered. Returns modifiers to register first.
    pub(crate) fn mods_for_key(&mut self, key: KeyCode) -> Option<ModifierCombination> {
        match self.mods {
            OneShotState::Initial(m) => {
                self.mods = OneShotState::Held(m);
                Some(m)
            }
            OneShotState::Single(m) => {
                if self.applied.push((key, m)).is_err() {
                    warn!("Too many keys hold one shot modifiers, {:?} stays armed", m);
                    return None;
                }
                self.mods = OneShotState::None;
                Some(m)
            }
            _ => None,
        }
    }

    /// A keycode was unregistered. Returns modifiers applied for it by a single one-shot that
    /// no other consumer still needs.
    pub(crate) fn mods_after_key(&mut self, key: KeyCode) -> Option<ModifierCombination> {
        let index = self.applied.iter().position(|&(k, _)| k == key)?;
        let (_, mods) = self.applied.swap_remove(index);
        let still_needed = self
            .applied
            .iter()
            .fold(ModifierCombination::new(), |acc, &(_, m)| acc | m);
        let released = mods & !still_needed;
        (!released.is_empty()).then_some(released)
    }

    /// Arm a one-shot layer. Returns a previous one-shot layer that must be turned off.
    ///
    /// A `held` one-shot layer acts as if its key were still pressed: it survives other keys
    /// until [`OneShot::release_layer`] is called.
    pub(crate) fn set_layer(&mut self, layer: u8, held: bool, now: Instant) -> Option<u8> {
        let previous = self.layer.value().copied().filter(|&l| l != layer);
        self.layer = if held {
            OneShotState::Initial(layer)
        } else {
            OneShotState::Single(layer)
        };
        self.layer_since = now;
        previous
    }

    /// The one-shot layer key went up. Returns the layer to turn off.
    pub(crate) fn release_layer(&mut self, now: Instant) -> Option<u8> {
        match self.layer {
            OneShotState::Initial(l) => {
                self.layer = OneShotState::Single(l);
                self.layer_since = now;
                None
            }
            OneShotState::Held(l) => {
                self.layer = OneShotState::None;
                Some(l)
            }
            _ => None,
        }
    }

    /// Another key changed state. Returns the layer to turn off.
    pub(crate) fn layer_on_key_event(&mut self, pressed: bool) -> Option<u8> {
        match self.layer {
            OneShotState::Initial(l) if pressed => {
                self.layer = OneShotState::Held(l);
                None
            }
            OneShotState::Single(l) if !pressed => {
                self.layer = OneShotState::None;
                Some(l)
            }
            _ => None,
        }
    }

    /// Drop unused single one-shots older than the timeout. Returns the layer to turn off.
    pub(crate) fn expire(&mut self, now: Instant) -> Option<u8> {
        if let OneShotState::Single(m) = self.mods
            && now >= self.mods_since + self.timeout
        {
            debug!("One shot modifiers {:?} timed out", m);
            self.mods = OneShotState::None;
        }
        if let OneShotState::Single(l) = self.layer
            && now >= self.layer_since + self.timeout
        {
            debug!("One shot layer {} timed out", l);
            self.layer = OneShotState::None;
            return Some(l);
        }
        None
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        let mods = match self.mods {
            OneShotState::Single(_) => Some(self.mods_since + self.timeout),
            _ => None,
        };
        let layer = match self.layer {
            OneShotState::Single(_) => Some(self.layer_since + self.timeout),
            _ => None,
        };
        match (mods, layer) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
