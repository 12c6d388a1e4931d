pub mod common;

use michele::keymap::{ALT, QWERTY};
use michele::oneshot::OneShotState;
use michele::types::keycode::KeyCode;
use michele::types::modifier::ModifierCombination;

use crate::common::{HostEvent::*, create_test_keyboard, ms, pos};

const LGUI: ModifierCombination = ModifierCombination::LGUI;

#[test]
fn test_alt_osl_tap_lasts_one_key() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::taps!(keyboard, [[pos::ALT_OSL, 0, 50]]);
    keyboard.tick(ms(250));
    assert_eq!(keyboard.state().oneshot().layer(), OneShotState::Single(ALT));

    // ALT row 1 col 3 is Up
    crate::taps!(keyboard, [[pos::E, 400, 450], [pos::E, 500, 550]]);
    assert_eq!(
        host.events(),
        [
            Layer(ALT),
            Register(KeyCode::Up),
            Unregister(KeyCode::Up),
            Layer(QWERTY),
            Register(KeyCode::E),
            Unregister(KeyCode::E)
        ]
    );
}

#[test]
fn test_alt_osl_applies_to_interrupting_key() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::taps!(keyboard, [[pos::ALT_OSL, 0, 50], [pos::E, 100, 150]]);
    assert_eq!(
        host.events(),
        [
            Layer(ALT),
            Register(KeyCode::Up),
            Unregister(KeyCode::Up),
            Layer(QWERTY)
        ]
    );
}

#[test]
fn test_alt_osl_double_tap_latches() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::taps!(keyboard, [[pos::ALT_OSL, 0, 50], [pos::ALT_OSL, 100, 150]]);
    keyboard.tick(ms(400));

    crate::taps!(keyboard, [[pos::E, 500, 550], [pos::E, 600, 650]]);
    assert_eq!(keyboard.state().layers().highest_layer(), ALT);
    assert_eq!(
        host.key_events(),
        [
            Register(KeyCode::Up),
            Unregister(KeyCode::Up),
            Register(KeyCode::Up),
            Unregister(KeyCode::Up)
        ]
    );

    // A single tap turns the latched layer back into a one-shot
    crate::taps!(keyboard, [[pos::ALT_OSL, 700, 750]]);
    keyboard.tick(ms(1000));
    assert_eq!(keyboard.state().oneshot().layer(), OneShotState::Single(ALT));
    crate::taps!(keyboard, [[pos::E, 1100, 1150]]);
    assert_eq!(keyboard.state().layers().highest_layer(), QWERTY);
}

#[test]
fn test_alt_osl_hold_is_alt() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::key_sequence!(keyboard, [[pos::ALT_OSL, true, 0]]);
    keyboard.tick(ms(250));
    crate::taps!(keyboard, [[pos::E, 300, 350]]);
    crate::key_sequence!(keyboard, [[pos::ALT_OSL, false, 400]]);
    assert_eq!(
        host.events(),
        [
            RegisterMods(ModifierCombination::LALT),
            Register(KeyCode::E),
            Unregister(KeyCode::E),
            UnregisterMods(ModifierCombination::LALT)
        ]
    );
}

#[test]
fn test_one_shot_times_out() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::taps!(keyboard, [[pos::SHIFT_CAPS, 0, 50]]);
    keyboard.tick(ms(250));
    assert!(keyboard.next_deadline().is_some());

    keyboard.tick(ms(1300));
    assert_eq!(keyboard.state().oneshot().mods(), OneShotState::None);
    assert_eq!(keyboard.next_deadline(), None);

    crate::taps!(keyboard, [[pos::Q, 1400, 1450]]);
    assert_eq!(host.events(), [Register(KeyCode::Q), Unregister(KeyCode::Q)]);
}

#[test]
fn test_osm_key_tap() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::taps!(keyboard, [[pos::OSM_LGUI, 0, 50], [pos::Q, 100, 150], [pos::W, 200, 250]]);
    assert_eq!(
        host.events(),
        [
            RegisterMods(LGUI),
            Register(KeyCode::Q),
            Unregister(KeyCode::Q),
            UnregisterMods(LGUI),
            Register(KeyCode::W),
            Unregister(KeyCode::W)
        ]
    );
}

#[test]
fn test_osm_key_held_acts_as_modifier() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::key_sequence!(
        keyboard,
        [
            [pos::OSM_LGUI, true, 0],
            [pos::Q, true, 50],
            [pos::Q, false, 80],
            [pos::W, true, 90],
            [pos::W, false, 95],
            [pos::OSM_LGUI, false, 100]
        ]
    );
    assert_eq!(
        host.events(),
        [
            RegisterMods(LGUI),
            Register(KeyCode::Q),
            Unregister(KeyCode::Q),
            Register(KeyCode::W),
            Unregister(KeyCode::W),
            UnregisterMods(LGUI)
        ]
    );
}

#[test]
fn test_overlapping_one_shot_consumers() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::taps!(keyboard, [[pos::SHIFT_CAPS, 0, 50]]);
    keyboard.tick(ms(300));
    crate::key_sequence!(
        keyboard,
        [
            [pos::G, true, 350],
            [pos::OSM_LGUI, true, 400],
            [pos::OSM_LGUI, false, 450],
            [pos::H, true, 500],
            [pos::G, false, 550],
            [pos::H, false, 600]
        ]
    );
    assert_eq!(
        host.events(),
        [
            RegisterMods(ModifierCombination::LSHIFT),
            Register(KeyCode::G),
            RegisterMods(LGUI),
            Register(KeyCode::H),
            Unregister(KeyCode::G),
            UnregisterMods(ModifierCombination::LSHIFT),
            Unregister(KeyCode::H),
            UnregisterMods(LGUI)
        ]
    );
    assert!(keyboard.state().mods().is_empty());
}

#[test]
fn test_shared_one_shot_mod_kept_until_last_consumer_release() {
    let (mut keyboard, host) = create_test_keyboard();
    crate::key_sequence!(
        keyboard,
        [
            [pos::OSM_LGUI, true, 0],
            [pos::OSM_LGUI, false, 50],
            [pos::G, true, 100],
            [pos::OSM_LGUI, true, 150],
            [pos::OSM_LGUI, false, 200],
            [pos::H, true, 250],
            [pos::G, false, 300]
        ]
    );
    assert_eq!(keyboard.state().mods(), LGUI);

    crate::key_sequence!(keyboard, [[pos::H, false, 350]]);
    assert_eq!(host.events().last(), Some(&UnregisterMods(LGUI)));
    assert!(keyboard.state().mods().is_empty());
}
