/// Whether the joysticks drive the mouse cursor or send navigation keys.
///
/// Updated only through [`InputMode::on_layer_change`], called whenever the active layers change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputMode {
    current_layer: u8,
    mouse_mode: bool,
    mouse_layers: u32,
    num_layers: u8,
}

impl InputMode {
    pub const fn new(mouse_layers: u32, num_layers: u8) -> Self {
        Self {
            current_layer: 0,
            mouse_mode: false,
            mouse_layers,
            num_layers,
        }
    }

    pub fn on_layer_change(&mut self, highest_layer: u8) {
        if highest_layer < self.num_layers && highest_layer < 32 {
            self.current_layer = highest_layer;
            self.mouse_mode = self.mouse_layers & (1 << highest_layer) != 0;
        } else {
            self.current_layer = 0;
            self.mouse_mode = false;
        }
        debug!(
            "Input mode: layer {}, mouse mode {}",
            self.current_layer, self.mouse_mode
        );
    }

    pub fn current_layer(&self) -> u8 {
        self.current_layer
    }

    /// Raw pointer motion reaches the host only in mouse mode
    pub fn mouse_mode(&self) -> bool {
        self.mouse_mode
    }
}
