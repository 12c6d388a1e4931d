//! Keyboard actions.
//!
//! - [`Action`] - Single operations that the keyboard sends or executes
//! - [`KeyAction`] - What a key position does, including tap-hold and tap dance behaviors

use crate::keycode::KeyCode;
use crate::modifier::ModifierCombination;

/// A key action at a keymap position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action.
    No,
    /// Transparent action, next active layer below will be checked.
    Transparent,
    /// A single action. Triggered when pressed and cancelled when released.
    Single(Action),
    /// Don't wait for the release of the key, press and release at once.
    Tap(Action),
    /// Tap hold action, `TapHold(tap, hold)`.
    TapHold(Action, Action),
    /// Tap dance, references a registered dance by id.
    TapDance(u8),
}

impl KeyAction {
    /// Convert `KeyAction` to the internal `Action`.
    /// Only valid for `Single` and `Tap` variant, returns `Action::No` for other variants.
    pub fn to_action(self) -> Action {
        match self {
            KeyAction::Single(a) | KeyAction::Tap(a) => a,
            _ => Action::No,
        }
    }

    /// Returns `true` if the final decision of the key depends on timing
    pub fn is_timed(&self) -> bool {
        matches!(self, KeyAction::TapHold(_, _) | KeyAction::TapDance(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, KeyAction::No)
    }
}

/// A single basic action that a keyboard can execute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Default action, no action.
    No,
    /// A normal key stroke, including mouse keys, media keys and keyboard commands.
    Key(KeyCode),
    /// Modifier combination, registered while the key is held.
    Modifier(ModifierCombination),
    /// Key stroke with modifier combination triggered.
    KeyWithModifier(KeyCode, ModifierCombination),
    /// Activate a layer while the key is held (`MO`)
    LayerOn(u8),
    /// Deactivate a layer
    LayerOff(u8),
    /// Toggle a layer (`TG`)
    LayerToggle(u8),
    /// Turn on the layer and turn off every other layer except the default layer (`TO`)
    LayerMove(u8),
    /// Set default layer (`DF`)
    DefaultLayer(u8),
    /// Oneshot layer, keep the layer active until the next key is released (`OSL`)
    OneShotLayer(u8),
    /// Oneshot modifier, applied to the next key only (`OSM`)
    OneShotModifier(ModifierCombination),
}

impl Action {
    /// Modifiers this action registers while active
    pub fn modifiers(self) -> ModifierCombination {
        match self {
            Action::Modifier(m) | Action::KeyWithModifier(_, m) => m,
            Action::Key(k) => k.to_modifier(),
            _ => ModifierCombination::new(),
        }
    }

    /// Returns `true` if the action only changes the active layers
    pub fn is_layer_action(self) -> bool {
        matches!(
            self,
            Action::LayerOn(_)
                | Action::LayerOff(_)
                | Action::LayerToggle(_)
                | Action::LayerMove(_)
                | Action::DefaultLayer(_)
                | Action::OneShotLayer(_)
        )
    }
}
