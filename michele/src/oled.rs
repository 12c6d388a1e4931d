//! Layer names shown on the OLED.

use core::fmt::{self, Write};

use crate::keymap::{ADJUST, ALT, LOWER, MOUSE, QWERTY, RAISE};

/// Name of the highest active layer
pub fn layer_name(layer: u8) -> &'static str {
    match layer {
        QWERTY => "QWERTY",
        MOUSE => "Mouse",
        ALT => "Alt",
        RAISE => "Raise",
        LOWER => "Lower",
        ADJUST => "Adjust",
        _ => "Undefined",
    }
}

/// Write the layer status line, as printed on the master half
pub fn write_layer_status<W: Write>(out: &mut W, layer: u8) -> fmt::Result {
    writeln!(out, "Layer: {}", layer_name(layer))
}
