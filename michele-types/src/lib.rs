//! # Michele Types
//!
//! Value types shared by the Michele keymap core.
//!
//! ## Modules
//!
//! - [`action`] - Key actions: plain keys, layer operations, one-shot, tap-hold and tap dance
//! - [`keycode`] - HID keycodes plus mouse, RGB and keyboard command codes
//! - [`modifier`] - Modifier combinations in HID report layout

#![no_std]

pub mod action;
pub mod keycode;
pub mod modifier;
