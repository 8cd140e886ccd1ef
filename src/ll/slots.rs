/// Maps logical slot indices of a ring onto medium addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotLayout {
    base_address: u32,
    slot_count: u32,
    record_size: u32,
}

impl SlotLayout {
    /// The caller guarantees that `slot_count > 0`, `record_size > 0` and that the range
    /// ends below `u32::MAX`.
    pub(crate) const fn new(base_address: u32, slot_count: u32, record_size: u32) -> Self {
        Self {
            base_address,
            slot_count,
            record_size,
        }
    }

    pub const fn base_address(&self) -> u32 {
        self.base_address
    }

    /// First address past the ring. Can be used as the base address of another store.
    pub const fn end_address(&self) -> u32 {
        self.base_address + self.slot_count * self.record_size
    }

    pub const fn slot_count(&self) -> u32 {
        self.slot_count
    }

    pub const fn record_size(&self) -> u32 {
        self.record_size
    }

    /// The index of the last slot in the ring.
    pub const fn end_slot(&self) -> u32 {
        self.slot_count - 1
    }

    pub fn slot_to_address(&self, slot: u32) -> u32 {
        debug_assert!(slot < self.slot_count);
        self.base_address + slot * self.record_size
    }

    /// Returns the slot starting at `address`, if it is a slot boundary within the ring.
    pub fn address_to_slot(&self, address: u32) -> Option<u32> {
        let offset = address.checked_sub(self.base_address)?;
        if offset % self.record_size != 0 {
            return None;
        }

        let slot = offset / self.record_size;
        (slot < self.slot_count).then_some(slot)
    }

    /// Reduces an arbitrary index into the ring.
    pub fn wrap(&self, index: u32) -> u32 {
        index % self.slot_count
    }

    pub fn next(&self, slot: u32) -> u32 {
        if slot >= self.end_slot() {
            0
        } else {
            slot + 1
        }
    }

    pub fn prev(&self, slot: u32) -> u32 {
        if slot == 0 {
            self.end_slot()
        } else {
            slot - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_laid_out_back_to_back() {
        let layout = SlotLayout::new(100, 4, 9);

        assert_eq!(layout.slot_to_address(0), 100);
        assert_eq!(layout.slot_to_address(1), 109);
        assert_eq!(layout.slot_to_address(3), 127);
        assert_eq!(layout.end_address(), 136);
    }

    #[test]
    fn address_to_slot_inverts_slot_to_address() {
        let layout = SlotLayout::new(100, 4, 9);

        for slot in 0..4 {
            assert_eq!(layout.address_to_slot(layout.slot_to_address(slot)), Some(slot));
        }
    }

    #[test]
    fn address_to_slot_rejects_foreign_addresses() {
        let layout = SlotLayout::new(100, 4, 9);

        assert_eq!(layout.address_to_slot(99), None);
        assert_eq!(layout.address_to_slot(101), None);
        assert_eq!(layout.address_to_slot(136), None);
    }

    #[test]
    fn stepping_wraps_around_the_ring() {
        let layout = SlotLayout::new(0, 8, 5);

        assert_eq!(layout.next(6), 7);
        assert_eq!(layout.next(7), 0);
        assert_eq!(layout.prev(0), 7);
        assert_eq!(layout.prev(5), 4);
    }

    #[test]
    fn single_slot_ring_steps_onto_itself() {
        let layout = SlotLayout::new(0, 1, 5);

        assert_eq!(layout.next(0), 0);
        assert_eq!(layout.prev(0), 0);
    }

    #[test]
    fn indices_are_reduced_modulo_slot_count() {
        let layout = SlotLayout::new(0, 8, 4);

        assert_eq!(layout.wrap(3), 3);
        assert_eq!(layout.wrap(11), 3);
        assert_eq!(layout.wrap(u32::MAX), u32::MAX % 8);
    }
}
