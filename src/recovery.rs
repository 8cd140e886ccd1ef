//! Power-loss recovery of the ring state.
//!
//! Every push writes one full record into the head slot, so after a crash the ring holds a
//! run of consecutive sequence numbers, followed by at most one torn record. Recovery runs in
//! two phases:
//!
//! 1. [`Scanner::find_break`] walks the ring forward until the sequence numbers stop
//!    increasing by one. The slot before the discontinuity holds the newest record, unless
//!    it was torn.
//! 2. [`Scanner::retreat_to_valid`] checks that record and steps backwards over invalid ones
//!    until it finds a committed record.

use core::marker::PhantomData;

use crate::{
    ll::{
        record::{Record, RecordCodec, MAX_RECORD_SIZE, SENTINEL},
        slots::SlotLayout,
    },
    medium::ByteMedium,
    payload::Payload,
    StoreError,
};

/// Position of the ring, derived from the medium contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingState {
    /// The slot the next push writes to.
    pub head: u32,
    /// The slot holding the newest committed record.
    pub last: u32,
    /// The sequence number of the next push.
    pub next_sequence: u32,
}

impl RingState {
    /// State of a ring that was never written.
    pub const ERASED: Self = Self {
        head: 0,
        last: 0,
        next_sequence: 0,
    };

    /// Returns `true` if the ring holds no committed record.
    pub fn is_empty(&self) -> bool {
        self.next_sequence == 0
    }

    /// Returns the state after a record has been written into the head slot.
    pub(crate) fn advance(self, layout: &SlotLayout) -> Self {
        Self {
            head: layout.next(self.head),
            last: self.head,
            next_sequence: self.next_sequence + 1,
        }
    }
}

/// Outcome of the forward scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanBreak {
    /// The ring was never written.
    Erased,
    /// The sequence is discontinuous after this slot.
    At(u32),
}

pub struct Scanner<'a, M, T> {
    medium: &'a mut M,
    layout: &'a SlotLayout,
    _payload: PhantomData<T>,
}

impl<'a, M, T> Scanner<'a, M, T>
where
    M: ByteMedium,
    T: Payload,
{
    pub fn new(medium: &'a mut M, layout: &'a SlotLayout) -> Self {
        Self {
            medium,
            layout,
            _payload: PhantomData,
        }
    }

    /// Runs both recovery phases.
    pub fn scan(&mut self) -> Result<RingState, StoreError<M::Error>> {
        let state = match self.find_break()? {
            ScanBreak::Erased => RingState::ERASED,
            ScanBreak::At(slot) => self.retreat_to_valid(slot)?,
        };

        log::info!(
            "Ring at {:#06X}: head = {}, last = {}, next sequence = {}",
            self.layout.base_address(),
            state.head,
            state.last,
            state.next_sequence
        );

        Ok(state)
    }

    /// Finds the slot after which the sequence numbers stop increasing by one.
    ///
    /// The successor of the last slot is the first slot, so the scan never leaves the ring.
    pub fn find_break(&mut self) -> Result<ScanBreak, StoreError<M::Error>> {
        let first = self.read_sequence(0)?;
        let mut current = first;

        for slot in 0..=self.layout.end_slot() {
            let next_slot = self.layout.next(slot);
            let next = if next_slot == 0 {
                first
            } else {
                self.read_sequence(next_slot)?
            };

            log::trace!("Slot {slot}: sequence {current:#010X}, next {next:#010X}");

            if next.wrapping_sub(current) != 1 {
                if slot == 0 && (next == SENTINEL || next_slot == 0) {
                    return self.resolve_first_slot(current);
                }

                return Ok(ScanBreak::At(slot));
            }

            current = next;
        }

        log::error!("No break found in the sequence of {} slots", self.layout.slot_count());
        Err(StoreError::SequenceUnbroken)
    }

    /// Classifies a break at the first slot when no other slot was ever written.
    ///
    /// Only a committed record keeps the ring from being erased. A record torn during the
    /// very first push is discarded.
    fn resolve_first_slot(&mut self, sequence: u32) -> Result<ScanBreak, StoreError<M::Error>> {
        if sequence != SENTINEL {
            let record = self.read_record(0)?;
            if record.is_committed() {
                return Ok(ScanBreak::At(0));
            }

            log::warn!(
                "Discarding torn first record (sequence {:#010X}, checksum {:#04X})",
                record.sequence,
                record.checksum
            );
        }

        log::debug!("Ring is erased");
        Ok(ScanBreak::Erased)
    }

    /// Steps backwards from `slot` until a committed record is found.
    ///
    /// At most `slot_count` slots are examined.
    pub fn retreat_to_valid(&mut self, mut slot: u32) -> Result<RingState, StoreError<M::Error>> {
        for _ in 0..self.layout.slot_count() {
            let record = self.read_record(slot)?;
            if record.is_committed() {
                return Ok(RingState {
                    head: self.layout.next(slot),
                    last: slot,
                    next_sequence: record.sequence + 1,
                });
            }

            log::warn!(
                "Slot {slot} does not hold a valid record (sequence {:#010X}, checksum {:#04X})",
                record.sequence,
                record.checksum
            );
            slot = self.layout.prev(slot);
        }

        log::error!(
            "None of the {} slots at {:#06X} hold a valid record",
            self.layout.slot_count(),
            self.layout.base_address()
        );
        Err(StoreError::NoValidRecord)
    }

    fn read_record(&mut self, slot: u32) -> Result<Record<T>, StoreError<M::Error>> {
        let mut buffer = [0; MAX_RECORD_SIZE];
        let bytes = &mut buffer[..RecordCodec::<T>::SIZE];
        self.medium
            .read(self.layout.slot_to_address(slot), bytes)
            .map_err(StoreError::Medium)?;

        Ok(RecordCodec::<T>::decode(bytes))
    }

    fn read_sequence(&mut self, slot: u32) -> Result<u32, StoreError<M::Error>> {
        let address = self.layout.slot_to_address(slot) + RecordCodec::<T>::SEQUENCE_OFFSET as u32;

        let mut bytes = [0; 4];
        self.medium
            .read(address, &mut bytes)
            .map_err(StoreError::Medium)?;

        Ok(RecordCodec::<T>::decode_sequence(&bytes))
    }
}
