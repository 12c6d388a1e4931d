use embassy_time::Instant;
use usbd_hid::descriptor::MouseReport;

/// Position of a key in the keymap matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPos {
    pub row: u8,
    pub col: u8,
}

impl KeyPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// A physical key transition, as delivered by the matrix scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub pos: KeyPos,
    pub pressed: bool,
    pub time: Instant,
}

impl KeyEvent {
    pub const fn press(row: u8, col: u8, time: Instant) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            pressed: true,
            time,
        }
    }

    pub const fn release(row: u8, col: u8, time: Instant) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            pressed: false,
            time,
        }
    }
}

/// One poll of the pointing devices
pub enum PointerEvent {
    /// A single joystick
    Single(MouseReport),
    /// Both halves' joysticks, merged into one report after processing
    Combined { left: MouseReport, right: MouseReport },
}
