use crate::{
    ll::{record::RECORD_OVERHEAD, slots::SlotLayout},
    payload::Payload,
};

/// Size of an AT24C256, the device the default configuration targets.
pub const DEFAULT_MEDIUM_SIZE: u32 = 1 << 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The ring must have at least one slot.
    NoSlots,

    /// The end of the ring does not fit in the address space.
    RangeOverflow,

    /// The ring extends past the end of the medium.
    ExceedsMedium { end_address: u32, medium_size: u32 },
}

/// Construction parameters of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoreConfig {
    /// First medium address owned by the store.
    pub base_address: u32,

    /// Number of slots in the ring.
    pub slot_count: u32,

    /// Store records with a sequence number and checksum. Without it the store only offers
    /// direct indexed access.
    pub wear_leveling: bool,

    /// Total size of the medium. Bounds the ring and sets the range of a full wipe.
    pub medium_size: u32,
}

impl StoreConfig {
    pub const fn wear_leveled(base_address: u32, slot_count: u32) -> Self {
        Self {
            base_address,
            slot_count,
            wear_leveling: true,
            medium_size: DEFAULT_MEDIUM_SIZE,
        }
    }

    pub const fn direct(base_address: u32, slot_count: u32) -> Self {
        Self {
            base_address,
            slot_count,
            wear_leveling: false,
            medium_size: DEFAULT_MEDIUM_SIZE,
        }
    }

    pub const fn with_medium_size(self, medium_size: u32) -> Self {
        Self {
            medium_size,
            ..self
        }
    }

    /// Moves the ring so that it starts where `end_address` points, usually the
    /// [`end_address`](crate::WearLevelStore::end_address) of the previous store on the medium.
    pub const fn chained_after(self, end_address: u32) -> Self {
        Self {
            base_address: end_address,
            ..self
        }
    }

    /// Checks the parameters for a store of `T` and returns the resulting slot layout.
    pub fn validate<T: Payload>(&self) -> Result<SlotLayout, ConfigError> {
        if self.slot_count == 0 {
            return Err(ConfigError::NoSlots);
        }

        let record_size = if self.wear_leveling {
            T::SIZE + RECORD_OVERHEAD
        } else {
            T::SIZE
        };

        let end_address = u32::try_from(record_size)
            .ok()
            .and_then(|size| size.checked_mul(self.slot_count))
            .and_then(|len| len.checked_add(self.base_address))
            .ok_or(ConfigError::RangeOverflow)?;

        if end_address > self.medium_size {
            return Err(ConfigError::ExceedsMedium {
                end_address,
                medium_size: self.medium_size,
            });
        }

        Ok(SlotLayout::new(
            self.base_address,
            self.slot_count,
            record_size as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wear_leveled_layout_includes_record_overhead() {
        let layout = StoreConfig::wear_leveled(16, 8).validate::<u32>().unwrap();

        assert_eq!(layout.record_size(), 9);
        assert_eq!(layout.end_address(), 16 + 72);
    }

    #[test]
    fn direct_layout_uses_bare_payload_size() {
        let layout = StoreConfig::direct(0, 8).validate::<u32>().unwrap();

        assert_eq!(layout.record_size(), 4);
        assert_eq!(layout.end_address(), 32);
    }

    #[test]
    fn zero_slots_are_rejected() {
        assert_eq!(
            StoreConfig::wear_leveled(0, 0).validate::<u32>(),
            Err(ConfigError::NoSlots)
        );
    }

    #[test]
    fn ring_past_the_medium_is_rejected() {
        let config = StoreConfig::direct(60, 2).with_medium_size(64);

        assert_eq!(
            config.validate::<u32>(),
            Err(ConfigError::ExceedsMedium {
                end_address: 68,
                medium_size: 64
            })
        );
    }

    #[test]
    fn ring_filling_the_medium_exactly_is_accepted() {
        let config = StoreConfig::direct(56, 2).with_medium_size(64);
        assert!(config.validate::<u32>().is_ok());
    }

    #[test]
    fn overflowing_range_is_rejected() {
        let config = StoreConfig::wear_leveled(u32::MAX - 8, 2).with_medium_size(u32::MAX);
        assert_eq!(config.validate::<u32>(), Err(ConfigError::RangeOverflow));

        let config = StoreConfig::wear_leveled(0, u32::MAX).with_medium_size(u32::MAX);
        assert_eq!(config.validate::<u32>(), Err(ConfigError::RangeOverflow));
    }

    #[test]
    fn chained_config_starts_at_previous_end() {
        let first = StoreConfig::wear_leveled(0, 4).validate::<u16>().unwrap();
        let second = StoreConfig::direct(0, 4)
            .chained_after(first.end_address())
            .validate::<u16>()
            .unwrap();

        assert_eq!(second.base_address(), 28);
        assert_eq!(second.end_address(), 36);
    }
}
