//! Joystick to navigation key translation.
//!
//! Outside mouse mode the joysticks don't move the cursor. Pushing a stick to the end of an
//! axis taps a key instead, once per deflection: the side re-arms only after its whole sample
//! history went back to exactly zero.

use heapless::HistoryBuf;
use michele_types::keycode::KeyCode;
use usbd_hid::descriptor::MouseReport;

use crate::config::{PointerConfig, SideKeys};
use crate::host::Actions;
use crate::input_mode::InputMode;

/// Sliding window of the last `N` samples of one axis. Starts at rest.
pub struct PointerHistory<const N: usize> {
    samples: HistoryBuf<i8, N>,
}

impl<const N: usize> Default for PointerHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PointerHistory<N> {
    pub fn new() -> Self {
        Self {
            samples: HistoryBuf::new_with(0),
        }
    }

    /// Push the newest sample, dropping the oldest
    pub fn push(&mut self, sample: i8) {
        self.samples.write(sample);
    }

    pub fn is_all_zero(&self) -> bool {
        self.samples.as_slice().iter().all(|&s| s == 0)
    }
}

/// History and latch of one joystick
#[derive(Default)]
pub struct SideState<const N: usize> {
    pub x: PointerHistory<N>,
    pub y: PointerHistory<N>,
    /// A key was tapped for the current deflection
    pub tap_sent: bool,
}

/// Receiver of the synthesized navigation taps
pub trait TapKey {
    fn tap_key(&mut self, key: KeyCode);
}

impl TapKey for Actions<'_> {
    fn tap_key(&mut self, key: KeyCode) {
        self.tap_code(key);
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Side {
    Left,
    Right,
}

/// Debouncer for one or two joysticks.
///
/// `N` is the history length, 6 for a single stick.
pub struct PointerDebouncer<const N: usize> {
    left: SideState<N>,
    right: SideState<N>,
    threshold: i8,
    left_keys: SideKeys,
    right_keys: SideKeys,
}

impl<const N: usize> PointerDebouncer<N> {
    pub fn new(config: &PointerConfig) -> Self {
        Self {
            left: SideState::default(),
            right: SideState::default(),
            threshold: config.threshold,
            left_keys: config.left_keys,
            right_keys: config.right_keys,
        }
    }

    pub fn left(&self) -> &SideState<N> {
        &self.left
    }

    pub fn right(&self) -> &SideState<N> {
        &self.right
    }

    /// Process a report of the single (left) joystick
    pub fn process(&mut self, report: MouseReport, mode: &InputMode, tapper: &mut impl TapKey) -> MouseReport {
        self.process_side(Side::Left, report, mode, tapper)
    }

    /// Process both joysticks and merge them into one report
    pub fn process_combined(
        &mut self,
        left: MouseReport,
        right: MouseReport,
        mode: &InputMode,
        tapper: &mut impl TapKey,
    ) -> MouseReport {
        let left = self.process_side(Side::Left, left, mode, tapper);
        let right = self.process_side(Side::Right, right, mode, tapper);
        MouseReport {
            buttons: left.buttons | right.buttons,
            x: left.x.saturating_add(right.x),
            y: left.y.saturating_add(right.y),
            wheel: left.wheel.saturating_add(right.wheel),
            pan: left.pan.saturating_add(right.pan),
        }
    }

    fn process_side(
        &mut self,
        side: Side,
        mut report: MouseReport,
        mode: &InputMode,
        tapper: &mut impl TapKey,
    ) -> MouseReport {
        let threshold = self.threshold;
        let (state, keys) = match side {
            Side::Left => (&mut self.left, self.left_keys),
            Side::Right => (&mut self.right, self.right_keys),
        };

        state.x.push(report.x);
        state.y.push(report.y);
        if state.x.is_all_zero() && state.y.is_all_zero() {
            state.tap_sent = false;
        }

        if mode.mouse_mode() {
            return report;
        }

        if !state.tap_sent {
            let x_key = axis_key(report.x, threshold, keys.x_positive, keys.x_negative);
            let y_key = axis_key(report.y, threshold, keys.y_positive, keys.y_negative);
            for key in [x_key, y_key].into_iter().flatten() {
                debug!("{:?} stick tapping {:?}", side, key);
                tapper.tap_key(key);
                state.tap_sent = true;
            }
        }

        report.x = 0;
        report.y = 0;
        report
    }
}

/// Key for an exact end of axis deflection
fn axis_key(value: i8, threshold: i8, positive: KeyCode, negative: KeyCode) -> Option<KeyCode> {
    if value == threshold {
        Some(positive)
    } else if value == threshold.saturating_neg() {
        Some(negative)
    } else {
        None
    }
}
