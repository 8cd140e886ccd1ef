//! Wear-leveling record store for EEPROM-class media.
//!
//! A [`WearLevelStore`] keeps the most recent value of a fixed-size [`Payload`] in a ring of
//! slots. Every [`push`](WearLevelStore::push) writes a new record tagged with an increasing
//! sequence number and an XOR checksum, so repeated updates are spread over the whole ring.
//! On startup the ring is scanned to find the newest valid record, which also tolerates a
//! record torn by a power loss.
//!
//! Stores without wear leveling offer plain indexed access through
//! [`read_mem`](WearLevelStore::read_mem) and [`write_mem`](WearLevelStore::write_mem).

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod diag;
pub mod ll;
pub mod medium;
pub mod payload;
pub mod recovery;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use medium::ByteMedium;
pub use payload::Payload;
pub use recovery::RingState;
pub use store::WearLevelStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError<E> {
    /// The medium failed to complete a transfer.
    Medium(E),

    /// The store parameters are invalid.
    Config(ConfigError),

    /// The recovery scan stepped back over every slot without finding a valid record.
    ///
    /// The range is neither erased nor holding a readable record. It should be wiped and
    /// provisioned again.
    NoValidRecord,

    /// The recovery scan did not find the end of the written sequence.
    SequenceUnbroken,

    /// The next sequence number would collide with the erased-slot sentinel.
    ///
    /// Nothing was written. The range has to be wiped before further pushes.
    SequenceExhausted,
}

impl<E> From<ConfigError> for StoreError<E> {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl<E> StoreError<E> {
    /// Returns `true` if the error indicates unrecoverable content on the medium.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::NoValidRecord | Self::SequenceUnbroken)
    }
}
