//! The seam between the keymap core and the firmware that runs it.
//!
//! [`KeyboardHost`] is what the firmware provides: HID key/modifier registration and keyboard
//! commands. [`Actions`] is what keymap code (tap dances, the keyboard core, the joystick
//! translator) uses: it layers the shared keyboard state on top of the host.

use embassy_time::Instant;
use michele_types::action::Action;
use michele_types::keycode::KeyCode;
use michele_types::modifier::ModifierCombination;
use usbd_hid::descriptor::MouseReport;

use crate::config::BehaviorConfig;
use crate::input_mode::InputMode;
use crate::layer::LayerState;
use crate::oneshot::OneShot;

/// Side effects that the firmware carries out for the keymap.
pub trait KeyboardHost {
    /// Add a key to the HID report
    fn register_key(&mut self, key: KeyCode);
    /// Remove a key from the HID report
    fn unregister_key(&mut self, key: KeyCode);
    fn register_mods(&mut self, mods: ModifierCombination);
    fn unregister_mods(&mut self, mods: ModifierCombination);
    /// Soft reset of the keyboard
    fn reset_keyboard(&mut self);
    fn jump_to_bootloader(&mut self);
    /// Active layers changed, for OLED and RGB observers
    fn layer_changed(&mut self, _layers: &LayerState) {}
    /// A processed joystick report is ready for the host
    fn send_mouse_report(&mut self, _report: MouseReport) {}
}

/// State shared by every part of the keymap.
pub struct KeyboardState {
    pub(crate) layers: LayerState,
    pub(crate) input_mode: InputMode,
    pub(crate) oneshot: OneShot,
    /// Modifiers currently registered to the host
    pub(crate) mods: ModifierCombination,
}

impl KeyboardState {
    pub fn new(num_layers: u8, config: &BehaviorConfig) -> Self {
        Self {
            layers: LayerState::new(num_layers),
            input_mode: InputMode::new(config.pointer.mouse_layers, num_layers),
            oneshot: OneShot::new(config.one_shot),
            mods: ModifierCombination::new(),
        }
    }

    pub fn layers(&self) -> &LayerState {
        &self.layers
    }

    pub fn input_mode(&self) -> &InputMode {
        &self.input_mode
    }

    pub fn mods(&self) -> ModifierCombination {
        self.mods
    }

    pub fn oneshot(&self) -> &OneShot {
        &self.oneshot
    }
}

/// Keymap side effects, applied to the host and to the shared state at once.
pub struct Actions<'a> {
    host: &'a mut dyn KeyboardHost,
    state: &'a mut KeyboardState,
    now: Instant,
}

impl<'a> Actions<'a> {
    pub fn new(host: &'a mut dyn KeyboardHost, state: &'a mut KeyboardState, now: Instant) -> Self {
        Self { host, state, now }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn state(&self) -> &KeyboardState {
        &*self.state
    }

    pub fn mods(&self) -> ModifierCombination {
        self.state.mods
    }

    pub fn register_code(&mut self, key: KeyCode) {
        if key.is_modifier() {
            self.register_mods(key.to_modifier());
            return;
        }
        match key {
            KeyCode::No => {}
            KeyCode::Bootloader => self.jump_to_bootloader(),
            KeyCode::Reboot => self.reset_keyboard(),
            _ => {
                if let Some(mods) = self.state.oneshot.mods_for_key(key) {
                    self.register_mods(mods);
                }
                self.host.register_key(key);
            }
        }
    }

    pub fn unregister_code(&mut self, key: KeyCode) {
        if key.is_modifier() {
            self.unregister_mods(key.to_modifier());
            return;
        }
        match key {
            KeyCode::No | KeyCode::Bootloader | KeyCode::Reboot => {}
            _ => {
                self.host.unregister_key(key);
                if let Some(mods) = self.state.oneshot.mods_after_key(key) {
                    self.unregister_mods(mods);
                }
            }
        }
    }

    /// Press and release a key at once
    pub fn tap_code(&mut self, key: KeyCode) {
        self.register_code(key);
        self.unregister_code(key);
    }

    pub fn register_mods(&mut self, mods: ModifierCombination) {
        if mods.is_empty() {
            return;
        }
        self.state.mods |= mods;
        self.host.register_mods(mods);
    }

    pub fn unregister_mods(&mut self, mods: ModifierCombination) {
        if mods.is_empty() {
            return;
        }
        self.state.mods &= !mods;
        self.host.unregister_mods(mods);
    }

    /// Trigger the press side of an action
    pub fn register_action(&mut self, action: Action) {
        match action {
            Action::No => {}
            Action::Key(key) => self.register_code(key),
            Action::Modifier(mods) => self.register_mods(mods),
            Action::KeyWithModifier(key, mods) => {
                self.register_mods(mods);
                self.register_code(key);
            }
            Action::LayerOn(layer) => self.layer_on(layer),
            Action::LayerOff(layer) => self.layer_off(layer),
            Action::LayerToggle(layer) => self.layer_toggle(layer),
            Action::LayerMove(layer) => self.layer_move(layer),
            Action::DefaultLayer(layer) => self.set_default_layer(layer),
            Action::OneShotLayer(layer) => self.set_oneshot_layer(layer, false),
            Action::OneShotModifier(mods) => self.set_oneshot_mods(mods),
        }
    }

    /// Undo what [`Actions::register_action`] keeps active
    pub fn unregister_action(&mut self, action: Action) {
        match action {
            Action::Key(key) => self.unregister_code(key),
            Action::Modifier(mods) => self.unregister_mods(mods),
            Action::KeyWithModifier(key, mods) => {
                self.unregister_code(key);
                self.unregister_mods(mods);
            }
            Action::LayerOn(layer) => self.layer_off(layer),
            _ => {}
        }
    }

    pub fn tap_action(&mut self, action: Action) {
        self.register_action(action);
        self.unregister_action(action);
    }

    pub fn layer_on(&mut self, layer: u8) {
        if self.state.layers.layer_on(layer) {
            self.layers_updated();
        }
    }

    pub fn layer_off(&mut self, layer: u8) {
        if self.state.layers.layer_off(layer) {
            self.layers_updated();
        }
    }

    pub fn layer_toggle(&mut self, layer: u8) {
        if self.state.layers.layer_toggle(layer) {
            self.layers_updated();
        }
    }

    pub fn layer_move(&mut self, layer: u8) {
        if self.state.layers.layer_move(layer) {
            self.layers_updated();
        }
    }

    pub fn set_default_layer(&mut self, layer: u8) {
        if self.state.layers.set_default(layer) {
            self.layers_updated();
        }
    }

    fn layers_updated(&mut self) {
        let highest = self.state.layers.highest_layer();
        debug!("Layer state: {:#b}, highest {}", self.state.layers.mask(), highest);
        self.state.input_mode.on_layer_change(highest);
        self.host.layer_changed(&self.state.layers);
    }

    /// Apply `mods` to the next registered key
    pub fn set_oneshot_mods(&mut self, mods: ModifierCombination) {
        self.state.oneshot.set_mods(mods, self.now);
    }

    /// Turn `layer` on until the next key is released.
    ///
    /// With `held`, the layer stays on across keys until [`Actions::clear_oneshot_layer_pressed`].
    pub fn set_oneshot_layer(&mut self, layer: u8, held: bool) {
        if let Some(previous) = self.state.oneshot.set_layer(layer, held, self.now) {
            self.layer_off(previous);
        }
        self.layer_on(layer);
    }

    /// Release the pressed state of a one-shot layer
    pub fn clear_oneshot_layer_pressed(&mut self) {
        if let Some(layer) = self.state.oneshot.release_layer(self.now) {
            self.layer_off(layer);
        }
    }

    pub(crate) fn press_oneshot_mods(&mut self, mods: ModifierCombination) {
        self.state.oneshot.press_mods(mods, self.now);
    }

    pub(crate) fn release_oneshot_mods(&mut self) {
        if let Some(mods) = self.state.oneshot.release_mods(self.now) {
            self.unregister_mods(mods);
        }
    }

    /// Let a pending one-shot layer see a key transition
    pub(crate) fn oneshot_layer_key_event(&mut self, pressed: bool) {
        if let Some(layer) = self.state.oneshot.layer_on_key_event(pressed) {
            self.layer_off(layer);
        }
    }

    pub(crate) fn expire_oneshot(&mut self) {
        if let Some(layer) = self.state.oneshot.expire(self.now) {
            self.layer_off(layer);
        }
    }

    pub fn reset_keyboard(&mut self) {
        info!("Resetting keyboard");
        self.host.reset_keyboard();
    }

    pub fn jump_to_bootloader(&mut self) {
        info!("Jumping to bootloader");
        self.host.jump_to_bootloader();
    }
}
