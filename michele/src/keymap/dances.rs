//! Tap dances of the Michele keymap.

use michele_types::action::{Action, KeyAction};
use michele_types::keycode::KeyCode;
use michele_types::modifier::ModifierCombination;

use super::layers::{ADJUST, ALT, COL, LOWER, MOUSE, NUM_LAYER, QWERTY, RAISE, ROW, get_default_keymap};
use crate::host::Actions;
use crate::tap_dance::{DanceBehavior, DanceOutcome, DanceState, TapDance, TapDances};

pub const NUM_DANCE: usize = 32;

/// Dance ids, as referenced by `td!` in the layer tables
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dance {
    AltOsl1 = 0,
    CtlOsl1,
    DelBspc,
    EscGrave,
    TabTilde,
    NineLprn,
    ZeroRprn,
    MinsUnds,
    EqlPlus,
    LbrcLcbr,
    RbrcRcbr,
    SclnColn,
    QuotDqt,
    CommLabk,
    DotRabk,
    SlshQues,
    BslsPipe,
    SmclCln,
    PgupHome,
    PgdnEnd,
    QLrAlt,
    /// Declared but never bound
    WLyr2,
    /// Declared but never bound
    ELyr3,
    RLrKey,
    TLrMs,
    ShiftCaps,
    SpcEnt,
    SpcBkspc,
    LSpace,
    /// Declared but never bound
    RSpace,
    LayerDn,
    LayerUp,
}

const fn key(k: KeyCode) -> Action {
    Action::Key(k)
}

const fn shifted(k: KeyCode) -> Action {
    Action::KeyWithModifier(k, ModifierCombination::LSHIFT)
}

/// Tap: one-shot ALT layer. Hold: Alt. Double tap: ALT latched. Double hold: Alt on ALT layer.
pub struct AltOsl;

impl DanceBehavior for AltOsl {
    fn on_finished(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match state.outcome {
            Some(DanceOutcome::SingleTap) => {
                actions.set_oneshot_layer(ALT, true);
                actions.clear_oneshot_layer_pressed();
            }
            Some(DanceOutcome::SingleHold) => actions.register_code(KeyCode::LAlt),
            Some(DanceOutcome::DoubleTap) => actions.set_oneshot_layer(ALT, true),
            Some(DanceOutcome::DoubleHold) => {
                actions.register_code(KeyCode::LAlt);
                actions.layer_on(ALT);
            }
            _ => {}
        }
    }

    fn on_reset(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match state.outcome {
            Some(DanceOutcome::SingleHold) => actions.unregister_code(KeyCode::LAlt),
            Some(DanceOutcome::DoubleHold) => {
                actions.layer_off(ALT);
                actions.unregister_code(KeyCode::LAlt);
            }
            _ => {}
        }
    }
}

/// Tap: one-shot Ctrl. Hold: Ctrl. Double tap: ALT latched. Double hold: Ctrl on ALT layer.
/// Triple tap: Ctrl+Shift, until the next key release.
pub struct CtlOsl;

impl DanceBehavior for CtlOsl {
    fn on_finished(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match state.outcome {
            Some(DanceOutcome::SingleTap) => actions.set_oneshot_mods(ModifierCombination::LCTRL),
            Some(DanceOutcome::SingleHold) => actions.register_code(KeyCode::LCtrl),
            Some(DanceOutcome::DoubleTap) => actions.set_oneshot_layer(ALT, true),
            Some(DanceOutcome::DoubleHold) => {
                actions.register_code(KeyCode::LCtrl);
                actions.layer_on(ALT);
            }
            Some(DanceOutcome::TripleTap) => {
                actions.register_mods(ModifierCombination::LCTRL);
                actions.register_mods(ModifierCombination::LSHIFT);
            }
            _ => {}
        }
    }

    fn on_reset(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match state.outcome {
            Some(DanceOutcome::SingleHold) => actions.unregister_code(KeyCode::LCtrl),
            Some(DanceOutcome::DoubleHold) => {
                actions.layer_off(ALT);
                actions.unregister_code(KeyCode::LCtrl);
            }
            _ => {}
        }
    }
}

/// Hold: LOWER. Double tap: back to QWERTY. Triple tap: reset the keyboard.
pub struct LayerDown;

impl DanceBehavior for LayerDown {
    fn on_finished(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match state.outcome {
            Some(DanceOutcome::SingleHold) => actions.layer_on(LOWER),
            Some(DanceOutcome::DoubleTap) => actions.layer_move(QWERTY),
            Some(DanceOutcome::TripleTap) => actions.reset_keyboard(),
            _ => {}
        }
    }

    fn on_reset(&self, state: &DanceState, actions: &mut Actions<'_>) {
        if state.outcome == Some(DanceOutcome::SingleHold) {
            actions.layer_off(LOWER);
        }
    }
}

/// Hold: RAISE. Double tap: move to RAISE. Triple tap: move to ADJUST.
pub struct LayerUp;

impl DanceBehavior for LayerUp {
    fn on_finished(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match state.outcome {
            Some(DanceOutcome::SingleHold) => actions.layer_on(RAISE),
            Some(DanceOutcome::DoubleTap) => actions.layer_move(RAISE),
            Some(DanceOutcome::TripleTap) => actions.layer_move(ADJUST),
            _ => {}
        }
    }

    fn on_reset(&self, state: &DanceState, actions: &mut Actions<'_>) {
        if state.outcome == Some(DanceOutcome::SingleHold) {
            actions.layer_off(RAISE);
        }
    }
}

/// Tap: one-shot Shift. Hold: Shift. Double tap: Caps Lock.
pub struct ShiftCaps;

impl DanceBehavior for ShiftCaps {
    fn on_finished(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match state.outcome {
            Some(DanceOutcome::SingleTap) => actions.set_oneshot_mods(ModifierCombination::LSHIFT),
            Some(DanceOutcome::SingleHold) => actions.register_code(KeyCode::LShift),
            Some(DanceOutcome::DoubleTap) => actions.tap_code(KeyCode::CapsLock),
            _ => {}
        }
    }

    fn on_reset(&self, state: &DanceState, actions: &mut Actions<'_>) {
        if state.outcome == Some(DanceOutcome::SingleHold) {
            actions.unregister_code(KeyCode::LShift);
        }
    }
}

/// Tap: Space. Hold: LOWER. Double tap: Enter.
pub struct LeftSpace;

impl DanceBehavior for LeftSpace {
    fn on_finished(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match state.outcome {
            Some(DanceOutcome::SingleTap) => actions.tap_code(KeyCode::Space),
            Some(DanceOutcome::SingleHold) => actions.layer_on(LOWER),
            Some(DanceOutcome::DoubleTap) => actions.tap_code(KeyCode::Enter),
            _ => {}
        }
    }

    fn on_reset(&self, state: &DanceState, actions: &mut Actions<'_>) {
        if state.outcome == Some(DanceOutcome::SingleHold) {
            actions.layer_off(LOWER);
        }
    }
}

/// Tap: `;`. Hold: right GUI. Double tap: `:`.
pub struct Semicolon;

impl DanceBehavior for Semicolon {
    fn on_finished(&self, state: &DanceState, actions: &mut Actions<'_>) {
        match state.outcome {
            Some(DanceOutcome::SingleTap) => actions.tap_code(KeyCode::Semicolon),
            Some(DanceOutcome::SingleHold) => actions.register_mods(ModifierCombination::RGUI),
            Some(DanceOutcome::DoubleTap) => actions.tap_action(shifted(KeyCode::Semicolon)),
            _ => {}
        }
    }

    fn on_reset(&self, state: &DanceState, actions: &mut Actions<'_>) {
        if state.outcome == Some(DanceOutcome::SingleHold) {
            actions.unregister_mods(ModifierCombination::RGUI);
        }
    }
}

static ALT_OSL: AltOsl = AltOsl;
static CTL_OSL: CtlOsl = CtlOsl;
static LAYER_DOWN: LayerDown = LayerDown;
static LAYER_UP: LayerUp = LayerUp;
static SHIFT_CAPS: ShiftCaps = ShiftCaps;
static LEFT_SPACE: LeftSpace = LeftSpace;
static SEMICOLON: Semicolon = Semicolon;

/// Bindings of every dance id, in registration order
pub fn bindings() -> [(Dance, TapDance<'static>); 29] {
    [
        (Dance::DelBspc, TapDance::Double(key(KeyCode::Backspace), key(KeyCode::Delete))),
        (Dance::EscGrave, TapDance::Double(key(KeyCode::Escape), key(KeyCode::Grave))),
        (Dance::TabTilde, TapDance::Double(key(KeyCode::Tab), shifted(KeyCode::Grave))),
        (Dance::NineLprn, TapDance::Double(key(KeyCode::Kc9), shifted(KeyCode::Kc9))),
        (Dance::ZeroRprn, TapDance::Double(key(KeyCode::Kc0), shifted(KeyCode::Kc0))),
        (Dance::MinsUnds, TapDance::Double(key(KeyCode::Minus), shifted(KeyCode::Minus))),
        (Dance::EqlPlus, TapDance::Double(key(KeyCode::Equal), shifted(KeyCode::Equal))),
        (Dance::LbrcLcbr, TapDance::Double(key(KeyCode::LeftBracket), shifted(KeyCode::LeftBracket))),
        (Dance::RbrcRcbr, TapDance::Double(key(KeyCode::RightBracket), shifted(KeyCode::RightBracket))),
        (Dance::SclnColn, TapDance::Double(key(KeyCode::Semicolon), shifted(KeyCode::Semicolon))),
        (Dance::QuotDqt, TapDance::Double(key(KeyCode::Quote), shifted(KeyCode::Quote))),
        (Dance::CommLabk, TapDance::Double(key(KeyCode::Comma), shifted(KeyCode::Comma))),
        (Dance::DotRabk, TapDance::Double(key(KeyCode::Dot), shifted(KeyCode::Dot))),
        (Dance::SlshQues, TapDance::Double(key(KeyCode::Slash), shifted(KeyCode::Slash))),
        (Dance::BslsPipe, TapDance::Double(key(KeyCode::Backslash), shifted(KeyCode::Backslash))),
        (Dance::SmclCln, TapDance::Advanced(&SEMICOLON)),
        (Dance::PgupHome, TapDance::Double(key(KeyCode::PageUp), key(KeyCode::Home))),
        (Dance::PgdnEnd, TapDance::Double(key(KeyCode::PageDown), key(KeyCode::End))),
        (Dance::QLrAlt, TapDance::LayerMove(key(KeyCode::Q), ALT)),
        (Dance::RLrKey, TapDance::LayerMove(key(KeyCode::R), RAISE)),
        (Dance::TLrMs, TapDance::LayerMove(key(KeyCode::T), MOUSE)),
        (Dance::ShiftCaps, TapDance::Advanced(&SHIFT_CAPS)),
        (Dance::SpcEnt, TapDance::Double(key(KeyCode::Space), key(KeyCode::Enter))),
        (Dance::SpcBkspc, TapDance::Double(key(KeyCode::Space), key(KeyCode::Backspace))),
        (Dance::LSpace, TapDance::Advanced(&LEFT_SPACE)),
        (Dance::AltOsl1, TapDance::Advanced(&ALT_OSL)),
        (Dance::CtlOsl1, TapDance::Advanced(&CTL_OSL)),
        (Dance::LayerDn, TapDance::Advanced(&LAYER_DOWN)),
        (Dance::LayerUp, TapDance::Advanced(&LAYER_UP)),
    ]
}

/// Layers and tap dances of the Michele rev1 joysticklayers keymap
pub fn michele() -> ([[[KeyAction; COL]; ROW]; NUM_LAYER], TapDances<'static, NUM_DANCE>) {
    let mut dances = TapDances::new();
    for (id, dance) in bindings() {
        if dances.register(id as u8, dance).is_err() {
            error!("Tap dance table full, {:?} is not bound", id);
        }
    }
    (get_default_keymap(), dances)
}
