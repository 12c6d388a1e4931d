pub mod test_macro;

use std::cell::RefCell;
use std::rc::Rc;

use embassy_time::Instant;
use michele::host::KeyboardHost;
use michele::keymap::{self, MicheleKeyboard};
use michele::layer::LayerState;
use michele::types::keycode::KeyCode;
use michele::types::modifier::ModifierCombination;
use michele::{BehaviorConfig, KeyEvent};
use usbd_hid::descriptor::MouseReport;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub const LSHIFT: ModifierCombination = ModifierCombination::LSHIFT;
pub const LCTRL: ModifierCombination = ModifierCombination::LCTRL;

/// Everything the keyboard asked the firmware to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Register(KeyCode),
    Unregister(KeyCode),
    RegisterMods(ModifierCombination),
    UnregisterMods(ModifierCombination),
    Reset,
    Bootloader,
    /// Highest active layer after a change
    Layer(u8),
    /// x, y and buttons of a sent mouse report
    Mouse(i8, i8, u8),
}

/// Host recording into a log shared with the test
#[derive(Clone, Default)]
pub struct RecordingHost {
    log: Rc<RefCell<Vec<HostEvent>>>,
}

impl RecordingHost {
    pub fn events(&self) -> Vec<HostEvent> {
        self.log.borrow().clone()
    }

    /// Recorded events without the layer notifications
    pub fn key_events(&self) -> Vec<HostEvent> {
        self.log
            .borrow()
            .iter()
            .copied()
            .filter(|e| !matches!(e, HostEvent::Layer(_)))
            .collect()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    fn push(&self, event: HostEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl KeyboardHost for RecordingHost {
    fn register_key(&mut self, key: KeyCode) {
        self.push(HostEvent::Register(key));
    }

    fn unregister_key(&mut self, key: KeyCode) {
        self.push(HostEvent::Unregister(key));
    }

    fn register_mods(&mut self, mods: ModifierCombination) {
        self.push(HostEvent::RegisterMods(mods));
    }

    fn unregister_mods(&mut self, mods: ModifierCombination) {
        self.push(HostEvent::UnregisterMods(mods));
    }

    fn reset_keyboard(&mut self) {
        self.push(HostEvent::Reset);
    }

    fn jump_to_bootloader(&mut self) {
        self.push(HostEvent::Bootloader);
    }

    fn layer_changed(&mut self, layers: &LayerState) {
        self.push(HostEvent::Layer(layers.highest_layer()));
    }

    fn send_mouse_report(&mut self, report: MouseReport) {
        self.push(HostEvent::Mouse(report.x, report.y, report.buttons));
    }
}

pub type TestKeyboard = MicheleKeyboard<'static, RecordingHost>;

pub fn create_test_keyboard_with_config(config: BehaviorConfig) -> (TestKeyboard, RecordingHost) {
    let (layers, dances) = keymap::michele();
    // Box::leak is acceptable in tests
    let layers = Box::leak(Box::new(layers));
    let host = RecordingHost::default();
    (TestKeyboard::new(host.clone(), layers, dances, config), host)
}

/// The Michele keymap with its own behavior config
pub fn create_test_keyboard() -> (TestKeyboard, RecordingHost) {
    create_test_keyboard_with_config(keymap::behavior_config())
}

pub fn ms(millis: u64) -> Instant {
    Instant::from_millis(millis)
}

pub fn press(row: u8, col: u8, millis: u64) -> KeyEvent {
    KeyEvent::press(row, col, ms(millis))
}

pub fn release(row: u8, col: u8, millis: u64) -> KeyEvent {
    KeyEvent::release(row, col, ms(millis))
}

pub fn report(x: i8, y: i8) -> MouseReport {
    MouseReport {
        buttons: 0,
        x,
        y,
        wheel: 0,
        pan: 0,
    }
}

/// Matrix positions of the QWERTY layer
pub mod pos {
    pub const BACKSPACE: (u8, u8) = (0, 0);
    pub const NINE_LPRN: (u8, u8) = (0, 9);
    pub const Q: (u8, u8) = (1, 1);
    pub const W: (u8, u8) = (1, 2);
    pub const E: (u8, u8) = (1, 3);
    pub const T: (u8, u8) = (1, 5);
    pub const SHIFT_CAPS: (u8, u8) = (2, 0);
    pub const MT_A: (u8, u8) = (2, 1);
    pub const MT_S: (u8, u8) = (2, 2);
    pub const MT_D: (u8, u8) = (2, 3);
    pub const MT_F: (u8, u8) = (2, 4);
    pub const G: (u8, u8) = (2, 5);
    pub const H: (u8, u8) = (2, 6);
    pub const MT_J: (u8, u8) = (2, 7);
    pub const SMCL_CLN: (u8, u8) = (2, 10);
    pub const CTL_OSL: (u8, u8) = (3, 0);
    pub const Z: (u8, u8) = (3, 1);
    pub const OSM_LGUI: (u8, u8) = (4, 2);
    pub const ALT_OSL: (u8, u8) = (4, 3);
    pub const LAYER_DN: (u8, u8) = (4, 4);
    pub const LAYER_UP: (u8, u8) = (4, 7);
}
