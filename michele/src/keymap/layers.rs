//! Layer tables of the Michele rev1 joysticklayers keymap.
//!
//! Rows 0..=3 are the two 6 column halves side by side, row 4 holds the five thumb keys of each
//! half in columns 1..=10.

use michele_types::action::KeyAction;
use michele_types::modifier::ModifierCombination;

use super::dances::Dance;
use crate::{a, k, layer, mt, osm, shifted, td};

pub const ROW: usize = 5;
pub const COL: usize = 12;
pub const NUM_LAYER: usize = 7;

pub const QWERTY: u8 = 0;
pub const ALT: u8 = 1;
pub const CTRL: u8 = 2;
pub const LOWER: u8 = 3;
pub const RAISE: u8 = 4;
pub const MOUSE: u8 = 5;
pub const ADJUST: u8 = 6;

/// Layers on which the joysticks move the cursor
pub const MOUSE_LAYERS: u32 = 1 << MOUSE | 1 << ADJUST;

const LGUI: ModifierCombination = ModifierCombination::LGUI;
const LALT: ModifierCombination = ModifierCombination::LALT;
const LSHIFT: ModifierCombination = ModifierCombination::LSHIFT;
const LCTRL: ModifierCombination = ModifierCombination::LCTRL;
const RCTRL: ModifierCombination = ModifierCombination::RCTRL;
const RSHIFT: ModifierCombination = ModifierCombination::RSHIFT;

/// Every key falls through to the layer below
const TRANSPARENT: [[KeyAction; COL]; ROW] = [[a!(Transparent); COL]; ROW];

pub const fn get_default_keymap() -> [[[KeyAction; COL]; ROW]; NUM_LAYER] {
    [
        // QWERTY
        layer!([
            [k!(Backspace), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), k!(Kc6), k!(Kc7), k!(Kc8), td!(Dance::NineLprn), td!(Dance::ZeroRprn), td!(Dance::MinsUnds)],
            [td!(Dance::TabTilde), k!(Q), k!(W), k!(E), k!(R), k!(T), k!(Y), k!(U), k!(I), k!(O), k!(P), td!(Dance::EqlPlus)],
            [td!(Dance::ShiftCaps), mt!(A, LGUI), mt!(S, LALT), mt!(D, LSHIFT), mt!(F, LCTRL), k!(G), k!(H), mt!(J, RCTRL), mt!(K, RSHIFT), mt!(L, LALT), td!(Dance::SmclCln), td!(Dance::QuotDqt)],
            [td!(Dance::CtlOsl1), k!(Z), k!(X), k!(C), k!(V), k!(B), k!(N), k!(M), td!(Dance::CommLabk), td!(Dance::DotRabk), td!(Dance::SlshQues), k!(RShift)],
            [a!(No), k!(Escape), osm!(LGUI), td!(Dance::AltOsl1), td!(Dance::LayerDn), k!(Space), k!(Enter), td!(Dance::LayerUp), k!(RGui), k!(RGui), td!(Dance::BslsPipe), a!(No)]
        ]),
        // ALT
        layer!([
            [k!(Insert), k!(Delete), k!(F2), k!(F3), k!(F4), k!(F5), k!(F6), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11)],
            [k!(PrintScreen), a!(No), a!(No), k!(Up), a!(No), shifted!(Kc9), shifted!(Kc0), k!(Kp7), k!(Kp8), k!(Kp9), k!(KpSlash), k!(F12)],
            [a!(No), a!(No), k!(Left), k!(Down), k!(Right), k!(LeftBracket), k!(RightBracket), k!(Kp4), k!(Kp5), k!(Kp6), k!(KpAsterisk), k!(KpMinus)],
            [a!(No), a!(No), a!(No), a!(No), a!(No), shifted!(LeftBracket), shifted!(RightBracket), k!(Kp1), k!(Kp2), k!(Kp3), k!(KpEqual), k!(KpPlus)],
            [a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), k!(KpEnter), k!(Kp0), k!(Kp0), k!(KpDot), k!(KpComma), a!(No)]
        ]),
        // CTRL, never filled in
        TRANSPARENT,
        // LOWER
        layer!([
            [k!(Insert), k!(F1), k!(F2), k!(F3), k!(F4), k!(F5), k!(F6), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11)],
            [k!(PrintScreen), a!(No), a!(No), k!(Up), a!(No), shifted!(Kc9), shifted!(Kc0), k!(Kp7), k!(Kp8), k!(Kp9), k!(KpSlash), k!(F12)],
            [a!(No), a!(No), k!(Left), k!(Down), k!(Right), k!(LeftBracket), k!(RightBracket), k!(Kp4), k!(Kp5), k!(Kp6), k!(KpAsterisk), k!(KpMinus)],
            [a!(No), a!(No), a!(No), a!(No), a!(No), shifted!(LeftBracket), shifted!(RightBracket), k!(Kp1), k!(Kp2), k!(Kp3), k!(KpEqual), k!(KpPlus)],
            [a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), k!(KpEnter), k!(Kp0), k!(Kp0), k!(KpDot), k!(KpComma), a!(No)]
        ]),
        // RAISE
        layer!([
            [a!(No), shifted!(Kc1), shifted!(Kc2), shifted!(Kc3), shifted!(Kc4), shifted!(Kc5), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [shifted!(Grave), shifted!(Kc6), shifted!(Kc7), shifted!(Kc8), shifted!(Kc9), shifted!(Kc0), td!(Dance::PgupHome), a!(No), k!(MouseWheelUp), a!(No), a!(No), k!(MouseAccel0)],
            [k!(Grave), shifted!(Minus), shifted!(Equal), shifted!(Backslash), k!(LeftBracket), k!(RightBracket), td!(Dance::PgdnEnd), k!(MouseBtn1), k!(MouseBtn2), k!(MouseBtn3), a!(No), k!(MouseAccel1)],
            [k!(Slash), k!(Backslash), shifted!(Comma), shifted!(Dot), shifted!(LeftBracket), shifted!(RightBracket), a!(No), k!(MouseWheelLeft), k!(MouseWheelDown), k!(MouseWheelRight), a!(No), k!(MouseAccel2)],
            [a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), k!(KpEnter), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(No)]
        ]),
        // MOUSE, never filled in
        TRANSPARENT,
        // ADJUST
        layer!([
            [a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [k!(Bootloader), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [a!(No), k!(RgbTog), k!(RgbHui), k!(RgbSai), k!(RgbVai), k!(RgbSpi), k!(RightBracket), k!(AudioVolDown), k!(AudioMute), k!(AudioVolUp), a!(No), a!(No)],
            [a!(No), k!(RgbModeForward), k!(RgbHud), k!(RgbSad), k!(RgbVad), k!(RgbSpd), shifted!(RightBracket), k!(MediaPrevTrack), k!(MediaPlayPause), k!(MediaNextTrack), a!(No), a!(No)],
            [a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), k!(KpEnter), a!(Transparent), a!(Transparent), a!(Transparent), a!(No), a!(No)]
        ]),
    ]
}
