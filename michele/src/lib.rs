//! # Michele
//!
//! Keymap core of the Antebios Michele rev1 "joysticklayers" keymap.
//!
//! The firmware feeds key transitions and joystick polls into a [`keyboard::Keyboard`], which
//! resolves them against the layer tables and drives the firmware back through
//! [`host::KeyboardHost`].
//!
//! ## Modules
//!
//! - [`tap_dance`] - Tap dance outcome classification and burst tracking
//! - [`pointer`] - Joystick to navigation key translation
//! - [`keymap`] - Layer tables, tap dance bindings and key lookup
//! - [`keyboard`] - Event processing: combos, tap-hold, one-shot keys and the event loop
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod channel;
pub mod combo;
pub mod config;
pub mod event;
pub mod host;
pub mod input_mode;
pub mod keyboard;
pub mod keymap;
pub mod layer;
pub mod layout_macro;
pub mod oled;
pub mod oneshot;
pub mod pointer;
pub mod tap_dance;
pub mod tap_hold;

pub use michele_types as types;

pub use config::BehaviorConfig;
pub use event::{KeyEvent, KeyPos, PointerEvent};
pub use host::{Actions, KeyboardHost, KeyboardState};
pub use keyboard::Keyboard;
pub use tap_dance::{DanceOutcome, DanceState, TapDance, TapDances};
