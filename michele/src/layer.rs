//! Active layer stack.

/// Bitmask of active layers plus the default layer.
///
/// The default layer is always considered active. Every mutator returns `true` when the mask
/// changed, so the caller knows when to notify layer observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerState {
    mask: u32,
    default_layer: u8,
    num_layers: u8,
}

impl LayerState {
    pub const MAX_LAYERS: u8 = 32;

    pub const fn new(num_layers: u8) -> Self {
        Self {
            mask: 0,
            default_layer: 0,
            num_layers: if num_layers > Self::MAX_LAYERS {
                Self::MAX_LAYERS
            } else {
                num_layers
            },
        }
    }

    fn valid(&self, layer: u8) -> bool {
        if layer >= self.num_layers {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer, self.num_layers
            );
            return false;
        }
        true
    }

    fn set_mask(&mut self, mask: u32) -> bool {
        let changed = self.mask != mask;
        self.mask = mask;
        changed
    }

    /// Activate given layer
    pub fn layer_on(&mut self, layer: u8) -> bool {
        if !self.valid(layer) {
            return false;
        }
        self.set_mask(self.mask | 1 << layer)
    }

    /// Deactivate given layer
    pub fn layer_off(&mut self, layer: u8) -> bool {
        if !self.valid(layer) {
            return false;
        }
        self.set_mask(self.mask & !(1 << layer))
    }

    /// Toggle given layer
    pub fn layer_toggle(&mut self, layer: u8) -> bool {
        if !self.valid(layer) {
            return false;
        }
        self.set_mask(self.mask ^ 1 << layer)
    }

    /// Turn on `layer` and turn off every other layer
    pub fn layer_move(&mut self, layer: u8) -> bool {
        if !self.valid(layer) {
            return false;
        }
        self.set_mask(1 << layer)
    }

    pub fn set_default(&mut self, layer: u8) -> bool {
        if !self.valid(layer) {
            return false;
        }
        let changed = self.default_layer != layer;
        self.default_layer = layer;
        changed
    }

    pub fn default_layer(&self) -> u8 {
        self.default_layer
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn is_on(&self, layer: u8) -> bool {
        layer == self.default_layer || (layer < Self::MAX_LAYERS && self.mask & (1 << layer) != 0)
    }

    /// Highest active layer, the default layer when no other layer is on
    pub fn highest_layer(&self) -> u8 {
        if self.mask == 0 {
            return self.default_layer;
        }
        let highest = (31 - self.mask.leading_zeros()) as u8;
        highest.max(self.default_layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_on_off_is_idempotent() {
        let mut layers = LayerState::new(7);
        assert!(layers.layer_on(3));
        assert!(!layers.layer_on(3));
        assert!(layers.is_on(3));
        assert!(layers.layer_off(3));
        assert!(!layers.layer_off(3));
        assert!(!layers.is_on(3));
        assert_eq!(layers.mask(), 0);
    }

    #[test]
    fn test_highest_layer() {
        let mut layers = LayerState::new(7);
        assert_eq!(layers.highest_layer(), 0);
        layers.layer_on(1);
        layers.layer_on(4);
        assert_eq!(layers.highest_layer(), 4);
        layers.layer_off(4);
        assert_eq!(layers.highest_layer(), 1);
    }

    #[test]
    fn test_layer_move_and_toggle() {
        let mut layers = LayerState::new(7);
        layers.layer_on(1);
        layers.layer_on(3);
        assert!(layers.layer_move(4));
        assert_eq!(layers.mask(), 1 << 4);
        assert!(!layers.layer_move(4));
        assert!(layers.layer_toggle(2));
        assert!(layers.is_on(2));
        assert!(layers.layer_toggle(2));
        assert!(!layers.is_on(2));
    }

    #[test]
    fn test_invalid_layer_is_ignored() {
        let mut layers = LayerState::new(7);
        assert!(!layers.layer_on(7));
        assert!(!layers.layer_move(31));
        assert!(!layers.set_default(9));
        assert_eq!(layers.mask(), 0);
        assert_eq!(layers.default_layer(), 0);
    }

    #[test]
    fn test_default_layer_is_always_on() {
        let mut layers = LayerState::new(7);
        assert!(layers.set_default(2));
        assert!(layers.is_on(2));
        assert_eq!(layers.highest_layer(), 2);
        layers.layer_on(1);
        assert_eq!(layers.highest_layer(), 2);
    }
}
