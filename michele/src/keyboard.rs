//! The keyboard: turns key events and joystick polls into host actions.
//!
//! Every key event first goes through the pending tap-hold key and interrupts running tap
//! dances, then it is looked up in the keymap, matched against combos and processed. Timed
//! behaviors (tap dance bursts, tap-hold, combos, one-shots) advance in [`Keyboard::tick`], and
//! [`Keyboard::run`] wakes up at [`Keyboard::next_deadline`] to drive them.

use embassy_futures::select::{Either3, select3};
use embassy_time::{Duration, Instant, Timer};
use heapless::{Deque, Vec};
use michele_types::action::{Action, KeyAction};
use michele_types::modifier::ModifierCombination;
use usbd_hid::descriptor::MouseReport;

use crate::channel::{KEY_EVENT_CHANNEL, POINTER_CHANNEL};
use crate::combo::{COMBO_MAX_LENGTH, COMBO_MAX_NUM, Combo, reorder_combos};
use crate::config::{BehaviorConfig, PointerConfig};
use crate::event::{KeyEvent, PointerEvent};
use crate::host::{Actions, KeyboardHost, KeyboardState};
use crate::keymap::KeyMap;
use crate::pointer::PointerDebouncer;
use crate::tap_dance::{TapDanceEngine, TapDances};
use crate::tap_hold::{TapHold, TapHoldDecision};

/// Modifiers dropped by the post-processing hook once both are registered
const CTRL_SHIFT: ModifierCombination = ModifierCombination::LCTRL.union(ModifierCombination::LSHIFT);

pub struct Keyboard<
    'a,
    H: KeyboardHost,
    const ROW: usize,
    const COL: usize,
    const NUM_LAYER: usize,
    const NUM_DANCE: usize,
    const HISTORY: usize = 6,
> {
    host: H,

    /// Keymap
    keymap: KeyMap<'a, ROW, COL, NUM_LAYER>,

    /// Layers, modifiers and one shot state
    state: KeyboardState,

    dances: TapDanceEngine<'a, NUM_DANCE>,

    tap_hold: TapHold,

    combos: Vec<Combo, COMBO_MAX_NUM>,
    combo_timeout: Duration,
    /// Buffer for pressed `KeyAction` and `KeyEvents` in combos
    combo_actions_buffer: Deque<(KeyAction, KeyEvent), COMBO_MAX_LENGTH>,
    /// Buffered combo keys are flushed at this time
    combo_deadline: Option<Instant>,

    pointer: PointerDebouncer<HISTORY>,
    pointer_config: PointerConfig,
}

impl<
    'a,
    H: KeyboardHost,
    const ROW: usize,
    const COL: usize,
    const NUM_LAYER: usize,
    const NUM_DANCE: usize,
    const HISTORY: usize,
> Keyboard<'a, H, ROW, COL, NUM_LAYER, NUM_DANCE, HISTORY>
{
    pub fn new(
        host: H,
        layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
        dances: TapDances<'a, NUM_DANCE>,
        behavior: BehaviorConfig,
    ) -> Self {
        let mut combos = behavior.combo.combos.clone();
        reorder_combos(&mut combos);

        Self {
            host,
            keymap: KeyMap::new(layers),
            state: KeyboardState::new(NUM_LAYER as u8, &behavior),
            dances: TapDanceEngine::new(dances, behavior.tap_dance),
            tap_hold: TapHold::new(behavior.tap_hold),
            combos,
            combo_timeout: behavior.combo.timeout,
            combo_actions_buffer: Deque::new(),
            combo_deadline: None,
            pointer: PointerDebouncer::new(&behavior.pointer),
            pointer_config: behavior.pointer,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    pub fn dances(&self) -> &TapDanceEngine<'a, NUM_DANCE> {
        &self.dances
    }

    pub fn tap_hold(&self) -> &TapHold {
        &self.tap_hold
    }

    pub fn pointer(&self) -> &PointerDebouncer<HISTORY> {
        &self.pointer
    }

    /// Main keyboard processing task. Receives key events and joystick polls and wakes up for
    /// pending timeouts, processed joystick reports are sent with [`KeyboardHost::send_mouse_report`].
    pub async fn run(&mut self) -> ! {
        loop {
            let deadline = self.next_deadline();
            let timeout = async {
                match deadline {
                    Some(at) => Timer::at(at).await,
                    None => core::future::pending::<()>().await,
                }
            };

            match select3(KEY_EVENT_CHANNEL.receive(), POINTER_CHANNEL.receive(), timeout).await {
                Either3::First(key_event) => self.process_key(key_event),
                Either3::Second(PointerEvent::Single(report)) => {
                    let report = self.poll_pointer(report, Instant::now());
                    self.host.send_mouse_report(report);
                }
                Either3::Second(PointerEvent::Combined { left, right }) => {
                    let report = self.poll_pointer_combined(left, right, Instant::now());
                    self.host.send_mouse_report(report);
                }
                Either3::Third(_) => self.tick(Instant::now()),
            }
        }
    }

    /// Process a key change, after firing every timeout due at the event's time
    pub fn process_key(&mut self, key_event: KeyEvent) {
        self.tick(key_event.time);
        self.process_inner(key_event);
    }

    /// Fire the timeouts due at `now`
    pub fn tick(&mut self, now: Instant) {
        {
            let mut actions = Actions::new(&mut self.host, &mut self.state, now);
            self.dances.tick(now, &mut actions);
            actions.expire_oneshot();
        }

        if let Some(hold) = self.tap_hold.timeout(now) {
            debug!("Hold timeout, got HOLD: {:?}", hold);
            let mut actions = Actions::new(&mut self.host, &mut self.state, now);
            actions.register_action(hold);
            actions.oneshot_layer_key_event(true);
            self.replay_tap_hold();
        }

        if let Some(deadline) = self.combo_deadline
            && now >= deadline
        {
            debug!("Combo timeout, dispatching buffered keys");
            self.dispatch_combos();
        }
    }

    /// Earliest time at which [`Keyboard::tick`] has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.dances.next_deadline(),
            self.tap_hold.next_deadline(),
            self.combo_deadline,
            self.state.oneshot.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Process a report of the single joystick
    pub fn poll_pointer(&mut self, report: MouseReport, now: Instant) -> MouseReport {
        let report = self.pointer_config.orient(report);
        let mode = self.state.input_mode;
        let mut actions = Actions::new(&mut self.host, &mut self.state, now);
        self.pointer.process(report, &mode, &mut actions)
    }

    /// Process the reports of both joysticks, merged into one
    pub fn poll_pointer_combined(&mut self, left: MouseReport, right: MouseReport, now: Instant) -> MouseReport {
        let left = self.pointer_config.orient(left);
        let right = self.pointer_config.orient(right);
        let mode = self.state.input_mode;
        let mut actions = Actions::new(&mut self.host, &mut self.state, now);
        self.pointer.process_combined(left, right, &mode, &mut actions)
    }

    fn process_inner(&mut self, key_event: KeyEvent) {
        match self.tap_hold.on_event(key_event) {
            TapHoldDecision::Ignore => {}
            TapHoldDecision::Buffer => return,
            TapHoldDecision::Tap(tap) => {
                // Restore the layer cache of the tap-hold key
                self.keymap.get_action_with_layer_cache(key_event, &self.state.layers);
                debug!("TAP action: {:?}", tap);
                let mut actions = Actions::new(&mut self.host, &mut self.state, key_event.time);
                actions.oneshot_layer_key_event(true);
                actions.tap_action(tap);
                actions.oneshot_layer_key_event(false);
                self.post_process(key_event);
                self.replay_tap_hold();
                return;
            }
            TapHoldDecision::Hold(hold) => {
                let mut actions = Actions::new(&mut self.host, &mut self.state, key_event.time);
                actions.register_action(hold);
                actions.oneshot_layer_key_event(true);
                self.replay_tap_hold();
                self.process_inner(key_event);
                return;
            }
        }

        if key_event.pressed {
            // Running dances finish before the new key is looked up
            let except = match self.keymap.peek_action(key_event, &self.state.layers) {
                KeyAction::TapDance(id) => Some(id),
                _ => None,
            };
            let mut actions = Actions::new(&mut self.host, &mut self.state, key_event.time);
            self.dances.interrupt_except(except, &mut actions);
        }

        let key_action = self.keymap.get_action_with_layer_cache(key_event, &self.state.layers);
        if self.combos.is_empty() {
            self.process_key_action(key_action, key_event);
        } else {
            self.process_combo(key_action, key_event);
        }
    }

    /// Replay the events held back by a resolved tap-hold key
    fn replay_tap_hold(&mut self) {
        let mut buffered = self.tap_hold.take_buffer();
        while let Some(event) = buffered.pop_front() {
            self.process_inner(event);
        }
    }

    fn process_combo(&mut self, key_action: KeyAction, key_event: KeyEvent) {
        let mut is_combo_action = false;
        let current_layer = self.state.layers.highest_layer();
        for combo in self.combos.iter_mut() {
            is_combo_action |= combo.update(key_action, key_event.pressed, current_layer);
        }

        if key_event.pressed && is_combo_action {
            if self.combo_actions_buffer.push_back((key_action, key_event)).is_err() {
                error!("Combo actions buffer overflowed! This is a bug and should not happen!");
            }

            let next_action = self
                .combos
                .iter_mut()
                .find_map(|combo| (combo.is_all_pressed() && !combo.is_triggered()).then(|| combo.trigger()));

            if let Some(output) = next_action {
                self.combo_actions_buffer.clear();
                self.combo_deadline = None;
                self.combos
                    .iter_mut()
                    .filter(|combo| !combo.is_triggered())
                    .for_each(Combo::reset);
                debug!("Combo action {:?} matched, clearing combo buffer", output);
                self.process_key_action(output, key_event);
            } else {
                self.combo_deadline = Some(key_event.time + self.combo_timeout);
            }
            return;
        }

        if !key_event.pressed {
            let mut is_combo_release = false;
            let mut released_output = None;
            for combo in self.combos.iter_mut() {
                if combo.is_triggered() && combo.contains(key_action) {
                    is_combo_release = true;
                    if combo.release(key_action) {
                        released_output = Some(combo.output());
                    }
                }
            }
            if let Some(output) = released_output {
                self.process_key_action(output, key_event);
            }
            // Members of a fired combo never reach the keymap
            if is_combo_release {
                return;
            }
        }

        self.dispatch_combos();
        self.process_key_action(key_action, key_event);
    }

    /// Dispatch buffered combo keys as normal keys
    fn dispatch_combos(&mut self) {
        self.combo_deadline = None;
        while let Some((action, event)) = self.combo_actions_buffer.pop_front() {
            debug!("Dispatching combo action: {:?}", action);
            self.process_key_action(action, event);
        }

        self.combos
            .iter_mut()
            .filter(|combo| !combo.is_triggered())
            .for_each(Combo::reset);
    }

    fn process_key_action(&mut self, key_action: KeyAction, key_event: KeyEvent) {
        let now = key_event.time;
        let mut actions = Actions::new(&mut self.host, &mut self.state, now);

        match key_action {
            KeyAction::TapDance(id) => {
                if key_event.pressed {
                    self.dances.press(id, now, &mut actions);
                } else {
                    self.dances.release(id, now, &mut actions);
                }
                actions.oneshot_layer_key_event(key_event.pressed);
            }
            KeyAction::TapHold(tap, hold) => {
                if key_event.pressed {
                    self.tap_hold.start(key_event.pos, tap, hold, now);
                } else if let Some(hold) = self.tap_hold.take_hold(key_event.pos) {
                    debug!("HOLD releasing: {:?}", hold);
                    actions.unregister_action(hold);
                    actions.oneshot_layer_key_event(false);
                }
            }
            KeyAction::Single(action) => {
                Self::process_action(&mut actions, action, key_event.pressed);
            }
            KeyAction::Tap(action) => {
                if key_event.pressed {
                    actions.tap_action(action);
                }
                actions.oneshot_layer_key_event(key_event.pressed);
            }
            KeyAction::No | KeyAction::Transparent => {
                actions.oneshot_layer_key_event(key_event.pressed);
            }
        }

        self.post_process(key_event);
    }

    fn process_action(actions: &mut Actions<'_>, action: Action, pressed: bool) {
        match action {
            Action::OneShotModifier(mods) => {
                if pressed {
                    actions.press_oneshot_mods(mods);
                } else {
                    actions.release_oneshot_mods();
                }
                actions.oneshot_layer_key_event(pressed);
            }
            Action::OneShotLayer(layer) => {
                if pressed {
                    actions.set_oneshot_layer(layer, true);
                } else {
                    actions.clear_oneshot_layer_pressed();
                }
            }
            _ => {
                // A one shot layer stays on while this key is down
                if pressed {
                    actions.oneshot_layer_key_event(true);
                    actions.register_action(action);
                } else {
                    actions.unregister_action(action);
                    actions.oneshot_layer_key_event(false);
                }
            }
        }
    }

    /// Runs after every key release: a Ctrl+Shift pair is never left registered
    fn post_process(&mut self, key_event: KeyEvent) {
        if key_event.pressed || !self.state.mods.contains(CTRL_SHIFT) {
            return;
        }
        debug!("Releasing Ctrl+Shift after {:?}", key_event.pos);
        let mut actions = Actions::new(&mut self.host, &mut self.state, key_event.time);
        actions.unregister_mods(CTRL_SHIFT);
    }
}

#[cfg(test)]
mod test {
    use michele_types::keycode::KeyCode;

    use super::*;
    use crate::tap_dance::TapDance;
    use crate::{a, k, mt, td};

    #[derive(Default)]
    struct Keys {
        registered: std::vec::Vec<KeyCode>,
    }

    impl KeyboardHost for Keys {
        fn register_key(&mut self, key: KeyCode) {
            self.registered.push(key);
        }
        fn unregister_key(&mut self, _key: KeyCode) {}
        fn register_mods(&mut self, _mods: ModifierCombination) {}
        fn unregister_mods(&mut self, _mods: ModifierCombination) {}
        fn reset_keyboard(&mut self) {}
        fn jump_to_bootloader(&mut self) {}
    }

    const LAYERS: [[[KeyAction; 4]; 1]; 1] = [[[k!(A), a!(No), td!(0), mt!(B, ModifierCombination::LCTRL)]]];

    fn keyboard() -> Keyboard<'static, Keys, 1, 4, 1, 1> {
        let mut dances = TapDances::new();
        let _ = dances.register(0, TapDance::Double(Action::Key(KeyCode::X), Action::Key(KeyCode::Y)));
        Keyboard::new(Keys::default(), &LAYERS, dances, BehaviorConfig::default())
    }

    #[test]
    fn test_idle_keyboard_has_no_deadline() {
        let mut keyboard = keyboard();
        assert_eq!(keyboard.next_deadline(), None);
        keyboard.process_key(KeyEvent::press(0, 1, Instant::from_millis(0)));
        keyboard.process_key(KeyEvent::release(0, 1, Instant::from_millis(10)));
        assert_eq!(keyboard.next_deadline(), None);
        assert!(keyboard.host().registered.is_empty());
    }

    #[test]
    fn test_tap_hold_press_interrupts_dance() {
        let mut keyboard = keyboard();
        keyboard.process_key(KeyEvent::press(0, 2, Instant::from_millis(0)));
        keyboard.process_key(KeyEvent::release(0, 2, Instant::from_millis(10)));
        assert_eq!(keyboard.next_deadline(), Some(Instant::from_millis(200)));

        keyboard.process_key(KeyEvent::press(0, 3, Instant::from_millis(100)));
        assert_eq!(keyboard.next_deadline(), Some(Instant::from_millis(300)));
        assert_eq!(keyboard.host().registered, [KeyCode::X]);
    }

    #[test]
    fn test_key_outside_matrix() {
        let mut keyboard = keyboard();
        keyboard.process_key(KeyEvent::press(3, 9, Instant::from_millis(0)));
        keyboard.process_key(KeyEvent::release(3, 9, Instant::from_millis(5)));
        keyboard.process_key(KeyEvent::press(0, 0, Instant::from_millis(10)));
        assert_eq!(keyboard.host().registered, [KeyCode::A]);
    }
}
