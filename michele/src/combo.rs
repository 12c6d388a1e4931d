use heapless::Vec;
use michele_types::action::KeyAction;

// Max number of combos
pub const COMBO_MAX_NUM: usize = 8;
// Max number of keys in a combo
pub const COMBO_MAX_LENGTH: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Combo {
    pub(crate) actions: Vec<KeyAction, COMBO_MAX_LENGTH>,
    pub(crate) output: KeyAction,
    pub(crate) layer: Option<u8>,
    /// Bit `i` is set while `actions[i]` is pressed
    state: u8,
    triggered: bool,
}

impl Default for Combo {
    fn default() -> Self {
        Self::empty()
    }
}

impl Combo {
    /// Members beyond [`COMBO_MAX_LENGTH`] are dropped
    pub fn new<I: IntoIterator<Item = KeyAction>>(actions: I, output: KeyAction, layer: Option<u8>) -> Self {
        Self {
            actions: actions.into_iter().take(COMBO_MAX_LENGTH).collect(),
            output,
            layer,
            state: 0,
            triggered: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::<KeyAction, COMBO_MAX_LENGTH>::new(), KeyAction::No, None)
    }

    pub fn output(&self) -> KeyAction {
        self.output
    }

    /// Record a member press. Returns whether `key_action` belongs to this combo.
    pub(crate) fn update(&mut self, key_action: KeyAction, pressed: bool, active_layer: u8) -> bool {
        if !pressed || key_action == KeyAction::No {
            return false;
        }

        if let Some(layer) = self.layer
            && layer != active_layer
        {
            return false;
        }

        let action_idx = self.actions.iter().position(|&a| a == key_action);
        if let Some(i) = action_idx {
            self.state |= 1 << i;
        } else if !self.is_triggered() {
            self.reset();
        }
        action_idx.is_some()
    }

    pub(crate) fn is_all_pressed(&self) -> bool {
        !self.actions.is_empty() && self.keys_pressed() == self.actions.len() as u32
    }

    pub(crate) fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub(crate) fn started(&self) -> bool {
        self.state != 0
    }

    pub(crate) fn keys_pressed(&self) -> u32 {
        self.state.count_ones()
    }

    /// Mark the combo as fired and return its output
    pub(crate) fn trigger(&mut self) -> KeyAction {
        self.triggered = true;
        self.output
    }

    /// Record a member release of a triggered combo, the combo resets once every member is up.
    /// Returns `true` for the first released member, which releases the output.
    pub(crate) fn release(&mut self, key_action: KeyAction) -> bool {
        let Some(i) = self.actions.iter().position(|&a| a == key_action) else {
            return false;
        };
        let first = self.is_all_pressed();
        self.state &= !(1 << i);
        if self.state == 0 {
            self.triggered = false;
        }
        first
    }

    pub(crate) fn contains(&self, key_action: KeyAction) -> bool {
        self.actions.contains(&key_action)
    }

    pub(crate) fn reset(&mut self) {
        self.state = 0;
        self.triggered = false;
    }
}

/// Longer combos are checked first, so `A+B+C` wins over `A+B`
pub(crate) fn reorder_combos(combos: &mut [Combo]) {
    combos.sort_unstable_by(|c1, c2| c2.actions.len().cmp(&c1.actions.len()))
}
