pub mod common;

use michele::types::keycode::KeyCode;
use michele::types::modifier::ModifierCombination;

use crate::common::{HostEvent::*, LCTRL, LSHIFT, create_test_keyboard, ms, pos};

#[test]
fn test_mod_tap_tap() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::taps!(keyboard, [[pos::MT_A, 0, 50]]);
    assert_eq!(host.events(), [Register(KeyCode::A), Unregister(KeyCode::A)]);
    assert_eq!(keyboard.next_deadline(), None);
}

#[test]
fn test_mod_tap_hold() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::key_sequence!(keyboard, [[pos::MT_A, true, 0]]);
    assert_eq!(keyboard.next_deadline(), Some(ms(200)));

    keyboard.tick(ms(250));
    crate::key_sequence!(keyboard, [[pos::MT_A, false, 300]]);
    assert_eq!(
        host.events(),
        [
            RegisterMods(ModifierCombination::LGUI),
            UnregisterMods(ModifierCombination::LGUI)
        ]
    );
}

#[test]
fn test_rolling_keys_keep_their_order() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::key_sequence!(
        keyboard,
        [
            [pos::MT_A, true, 0],
            [pos::W, true, 30],
            [pos::MT_A, false, 60],
            [pos::W, false, 90]
        ]
    );
    assert_eq!(
        host.events(),
        [
            Register(KeyCode::A),
            Unregister(KeyCode::A),
            Register(KeyCode::W),
            Unregister(KeyCode::W)
        ]
    );
}

#[test]
fn test_hold_applies_to_buffered_key() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::key_sequence!(keyboard, [[pos::MT_F, true, 0], [pos::Q, true, 50]]);
    assert!(host.events().is_empty());

    keyboard.tick(ms(250));
    crate::key_sequence!(keyboard, [[pos::Q, false, 300], [pos::MT_F, false, 350]]);
    assert_eq!(
        host.events(),
        [
            RegisterMods(LCTRL),
            Register(KeyCode::Q),
            Unregister(KeyCode::Q),
            UnregisterMods(LCTRL)
        ]
    );
}

#[test]
fn test_ctrl_shift_released_after_key() {
    let (mut keyboard, host) = create_test_keyboard();
    // Shift from the dance, Ctrl from the home row
    crate::key_sequence!(keyboard, [[pos::SHIFT_CAPS, true, 0], [pos::MT_F, true, 10]]);
    keyboard.tick(ms(250));
    assert_eq!(keyboard.state().mods(), LCTRL | LSHIFT);

    crate::taps!(keyboard, [[pos::G, 300, 350]]);
    assert_eq!(
        host.events(),
        [
            RegisterMods(LSHIFT),
            RegisterMods(LCTRL),
            Register(KeyCode::G),
            Unregister(KeyCode::G),
            UnregisterMods(LCTRL | LSHIFT)
        ]
    );
    assert!(keyboard.state().mods().is_empty());
}

#[test]
fn test_full_buffer_resolves_hold() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::key_sequence!(keyboard, [[pos::MT_F, true, 0]]);
    // Eight buffered events, the ninth forces the hold
    crate::taps!(
        keyboard,
        [
            [pos::Q, 10, 11],
            [pos::W, 12, 13],
            [pos::E, 14, 15],
            [pos::Z, 16, 17],
            [pos::G, 18, 19]
        ]
    );
    assert_eq!(
        host.events()[..3],
        [RegisterMods(LCTRL), Register(KeyCode::Q), Unregister(KeyCode::Q)]
    );
    assert_eq!(host.events().last(), Some(&Unregister(KeyCode::G)));
    assert!(keyboard.tap_hold().pending().is_none());
}

#[test]
fn test_five_home_row_mods_all_released() {
    let (mut keyboard, host) = create_test_keyboard();
    let keys = [pos::MT_A, pos::MT_S, pos::MT_D, pos::MT_F, pos::MT_J];
    for (i, key) in keys.into_iter().enumerate() {
        let at = 300 * i as u64;
        crate::key_sequence!(keyboard, [[key, true, at]]);
        keyboard.tick(ms(at + 250));
    }
    assert_eq!(
        keyboard.state().mods(),
        ModifierCombination::LGUI
            | ModifierCombination::LALT
            | ModifierCombination::LSHIFT
            | ModifierCombination::LCTRL
            | ModifierCombination::RCTRL
    );

    for (i, key) in keys.into_iter().enumerate() {
        crate::key_sequence!(keyboard, [[key, false, 1500 + 10 * i as u64]]);
    }
    assert!(keyboard.state().mods().is_empty());
    assert_eq!(host.events().last(), Some(&UnregisterMods(ModifierCombination::RCTRL)));
}
