//! Layer tables and key lookup.
//!
//! The Michele keymap itself lives in [`layers`] and [`dances`].

pub mod dances;
pub mod layers;

use michele_types::action::KeyAction;

use crate::config::{BehaviorConfig, PointerConfig};
use crate::event::KeyEvent;
use crate::keyboard::Keyboard;
use crate::layer::LayerState;

pub use dances::{Dance, NUM_DANCE, michele};
pub use layers::{ADJUST, ALT, COL, CTRL, LOWER, MOUSE, MOUSE_LAYERS, NUM_LAYER, QWERTY, RAISE, ROW};

/// Keyboard running the Michele keymap, with a joystick history of 12 polls per axis
pub type MicheleKeyboard<'a, H> = Keyboard<'a, H, ROW, COL, NUM_LAYER, NUM_DANCE, 12>;

/// Behavior of the Michele keymap. Both joystick axes are mounted inverted, the cursor moves on
/// the MOUSE and ADJUST layers.
pub fn behavior_config() -> BehaviorConfig {
    BehaviorConfig {
        pointer: PointerConfig {
            invert_x: true,
            invert_y: true,
            mouse_layers: MOUSE_LAYERS,
            ..PointerConfig::default()
        },
        ..BehaviorConfig::default()
    }
}

/// Keymap represents the stack of layers.
///
/// Uses tuple `(row, col, layer)` to retrieve the action of a key. Releases are looked up on
/// the layer the key was pressed on.
pub struct KeyMap<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
    /// Layer each pressed key was resolved on
    layer_cache: [[u8; COL]; ROW],
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> KeyMap<'a, ROW, COL, NUM_LAYER> {
    pub fn new(layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER]) -> Self {
        Self {
            layers,
            layer_cache: [[0; COL]; ROW],
        }
    }

    pub fn get_action_at(&self, row: usize, col: usize, layer_num: usize) -> KeyAction {
        self.layers
            .get(layer_num)
            .and_then(|l| l.get(row))
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(KeyAction::No)
    }

    /// Fetch the action in keymap, with layer cache
    pub fn get_action_with_layer_cache(&mut self, key_event: KeyEvent, layers: &LayerState) -> KeyAction {
        let row = key_event.pos.row as usize;
        let col = key_event.pos.col as usize;
        if row >= ROW || col >= COL {
            warn!("Key {:?} is outside of the keymap", key_event.pos);
            return KeyAction::No;
        }

        if !key_event.pressed {
            // Releasing a pressed key, use cached layer and restore the cache
            let layer = self.pop_layer_from_cache(row, col, layers.default_layer());
            return self.get_action_at(row, col, layer as usize);
        }

        match self.resolve(row, col, layers) {
            Some((layer_idx, action)) => {
                self.layer_cache[row][col] = layer_idx;
                action
            }
            None => KeyAction::No,
        }
    }

    /// Action a press of `key_event` would resolve to, without touching the layer cache
    pub fn peek_action(&self, key_event: KeyEvent, layers: &LayerState) -> KeyAction {
        let row = key_event.pos.row as usize;
        let col = key_event.pos.col as usize;
        if row >= ROW || col >= COL {
            return KeyAction::No;
        }
        self.resolve(row, col, layers).map_or(KeyAction::No, |(_, action)| action)
    }

    fn resolve(&self, row: usize, col: usize, layers: &LayerState) -> Option<(u8, KeyAction)> {
        // Iterate from higher layer to lower layer, the lowest checked layer is the default layer
        for (layer_idx, layer) in self.layers.iter().enumerate().rev() {
            if layers.is_on(layer_idx as u8) {
                let action = layer[row][col];
                if action == KeyAction::Transparent {
                    continue;
                }
                return Some((layer_idx as u8, action));
            }

            if layer_idx as u8 == layers.default_layer() {
                break;
            }
        }
        None
    }

    fn pop_layer_from_cache(&mut self, row: usize, col: usize, default_layer: u8) -> u8 {
        let layer = self.layer_cache[row][col];
        self.layer_cache[row][col] = default_layer;
        layer
    }
}
