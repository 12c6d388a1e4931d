use embassy_time::Duration;
use heapless::Vec;
use michele_types::keycode::KeyCode;
use usbd_hid::descriptor::MouseReport;

use crate::combo::{COMBO_MAX_NUM, Combo};

/// Config for configurable action behavior
#[derive(Clone, Debug, Default)]
pub struct BehaviorConfig {
    pub tap_dance: TapDanceConfig,
    pub tap_hold: TapHoldConfig,
    pub one_shot: OneShotConfig,
    pub combo: CombosConfig,
    pub pointer: PointerConfig,
}

/// Configurations for tap dance behavior
#[derive(Clone, Copy, Debug)]
pub struct TapDanceConfig {
    /// A burst finishes when no new tap arrives within this window after the last press
    pub tapping_term: Duration,
}

impl Default for TapDanceConfig {
    fn default() -> Self {
        Self {
            tapping_term: Duration::from_millis(200),
        }
    }
}

/// Configurations for tap hold behavior
#[derive(Clone, Copy, Debug)]
pub struct TapHoldConfig {
    pub hold_timeout: Duration,
}

impl Default for TapHoldConfig {
    fn default() -> Self {
        Self {
            hold_timeout: Duration::from_millis(200),
        }
    }
}

/// Config for one shot behavior
#[derive(Clone, Copy, Debug)]
pub struct OneShotConfig {
    pub timeout: Duration,
}

impl Default for OneShotConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
        }
    }
}

/// Config for combo behavior
#[derive(Clone, Debug)]
pub struct CombosConfig {
    pub combos: Vec<Combo, COMBO_MAX_NUM>,
    pub timeout: Duration,
}

impl Default for CombosConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(50),
            combos: Vec::new(),
        }
    }
}

/// Keys tapped when a joystick reaches the end of an axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SideKeys {
    pub x_positive: KeyCode,
    pub x_negative: KeyCode,
    pub y_positive: KeyCode,
    pub y_negative: KeyCode,
}

impl SideKeys {
    /// Left stick: horizontal jumps to line ends, vertical pages
    pub const LEFT: Self = Self {
        x_positive: KeyCode::End,
        x_negative: KeyCode::Home,
        y_positive: KeyCode::PageDown,
        y_negative: KeyCode::PageUp,
    };

    /// Right stick: arrow keys
    pub const RIGHT: Self = Self {
        x_positive: KeyCode::Right,
        x_negative: KeyCode::Left,
        y_positive: KeyCode::Down,
        y_negative: KeyCode::Up,
    };
}

/// Config for the joystick to key translation
#[derive(Clone, Copy, Debug)]
pub struct PointerConfig {
    /// Deflection that fires a key tap, matched as `+threshold` and `-threshold`
    pub threshold: i8,
    /// Invert the x axis of incoming reports
    pub invert_x: bool,
    /// Invert the y axis of incoming reports
    pub invert_y: bool,
    /// Bitmask of layers on which the joysticks drive the mouse cursor
    pub mouse_layers: u32,
    pub left_keys: SideKeys,
    pub right_keys: SideKeys,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            threshold: 7,
            invert_x: false,
            invert_y: false,
            mouse_layers: 0,
            left_keys: SideKeys::LEFT,
            right_keys: SideKeys::RIGHT,
        }
    }
}

impl PointerConfig {
    /// Apply the configured axis inversion to a raw report
    pub fn orient(&self, mut report: MouseReport) -> MouseReport {
        if self.invert_x {
            report.x = report.x.saturating_neg();
        }
        if self.invert_y {
            report.y = report.y.saturating_neg();
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orient() {
        let config = PointerConfig {
            invert_x: true,
            ..PointerConfig::default()
        };
        let report = config.orient(MouseReport {
            buttons: 0,
            x: 7,
            y: -3,
            wheel: 0,
            pan: 0,
        });
        assert_eq!(report.x, -7);
        assert_eq!(report.y, -3);

        let report = config.orient(MouseReport {
            buttons: 0,
            x: i8::MIN,
            y: 0,
            wheel: 0,
            pan: 0,
        });
        assert_eq!(report.x, i8::MAX);
    }
}
