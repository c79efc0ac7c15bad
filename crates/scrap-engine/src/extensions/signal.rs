// extensions/signal.rs
//
// Synchronous observer list. Slots run in connection order when emitted.

use std::fmt;

/// Handle returned by `connect`, used to disconnect a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

type Slot<T> = Box<dyn FnMut(&T)>;

pub struct Signal<T> {
    slots: Vec<(SlotId, Slot<T>)>,
    next_id: u32,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("slots", &self.slots.len()).finish()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, slot: impl FnMut(&T) + 'static) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, Box::new(slot)));
        id
    }

    pub fn disconnect(&mut self, id: SlotId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(slot, _)| *slot != id);
        self.slots.len() != before
    }

    pub fn disconnect_all(&mut self) {
        self.slots.clear();
    }

    pub fn emit(&mut self, value: &T) {
        for (_, slot) in self.slots.iter_mut() {
            slot(value);
        }
    }

    /// Emit to every slot except `skip`.
    pub fn emit_for_all_but_one(&mut self, skip: SlotId, value: &T) {
        for (id, slot) in self.slots.iter_mut() {
            if *id != skip {
                slot(value);
            }
        }
    }

    /// Emit to a single slot. Returns false if it is not connected.
    pub fn emit_for(&mut self, target: SlotId, value: &T) -> bool {
        match self.slots.iter_mut().find(|(id, _)| *id == target) {
            Some((_, slot)) => {
                slot(value);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
