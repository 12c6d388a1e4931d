//! Exposed channels which feed the keyboard event loop

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
pub use embassy_sync::{blocking_mutex, channel};

use crate::event::{KeyEvent, PointerEvent};

pub type RawMutex = CriticalSectionRawMutex;

pub const EVENT_CHANNEL_SIZE: usize = 16;
pub const POINTER_CHANNEL_SIZE: usize = 4;

/// Channel for key events only
pub static KEY_EVENT_CHANNEL: Channel<RawMutex, KeyEvent, EVENT_CHANNEL_SIZE> = Channel::new();
/// Channel for joystick polls
pub static POINTER_CHANNEL: Channel<RawMutex, PointerEvent, POINTER_CHANNEL_SIZE> = Channel::new();
