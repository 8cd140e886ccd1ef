use core::marker::PhantomData;

use crate::{
    config::{ConfigError, StoreConfig},
    ll::{
        record::{Record, RecordCodec, MAX_PAYLOAD_SIZE, MAX_RECORD_SIZE, SENTINEL},
        slots::SlotLayout,
    },
    medium::{ByteMedium, ERASED_BYTE},
    payload::Payload,
    recovery::{RingState, Scanner},
    StoreError,
};

/// Chunk size of [`WearLevelStore::wipe`].
const WIPE_CHUNK: usize = 8;

/// A ring of fixed-size records on a [`ByteMedium`].
///
/// With wear leveling enabled, [`push`](Self::push) appends records and
/// [`last`](Self::last) returns the newest one. Without it, the slots are plain array
/// elements accessed through [`read_mem`](Self::read_mem) and [`write_mem`](Self::write_mem).
pub struct WearLevelStore<M, T> {
    medium: M,
    layout: SlotLayout,
    wear_leveling: bool,
    medium_size: u32,
    state: Option<RingState>,
    _payload: PhantomData<T>,
}

impl<M, T> WearLevelStore<M, T>
where
    M: ByteMedium,
    T: Payload,
{
    /// Creates a store without touching the medium.
    ///
    /// The ring state of a wear-leveled store is recovered on first use, or explicitly by
    /// calling [`recover`](Self::recover).
    pub fn new(medium: M, config: StoreConfig) -> Result<Self, ConfigError> {
        // Rejects unsupported payload sizes at compile time
        let _ = RecordCodec::<T>::SIZE;

        let layout = config.validate::<T>()?;

        log::debug!(
            "Store at {:#06X}..{:#06X}: {} slots of {} bytes, wear leveling: {}",
            layout.base_address(),
            layout.end_address(),
            layout.slot_count(),
            layout.record_size(),
            config.wear_leveling
        );

        Ok(Self {
            medium,
            layout,
            wear_leveling: config.wear_leveling,
            medium_size: config.medium_size,
            state: None,
            _payload: PhantomData,
        })
    }

    /// Creates a wear-leveled store and recovers its ring state from the medium.
    ///
    /// # Panics
    ///
    /// Panics if `config` disables wear leveling.
    pub fn mount(medium: M, config: StoreConfig) -> Result<Self, StoreError<M::Error>> {
        let mut store = Self::new(medium, config)?;
        store.recover()?;
        Ok(store)
    }

    /// Scans the medium and replaces the cached ring state.
    ///
    /// # Panics
    ///
    /// Panics if wear leveling is disabled.
    pub fn recover(&mut self) -> Result<RingState, StoreError<M::Error>> {
        self.assert_wear_leveling();

        let state = Scanner::<M, T>::new(&mut self.medium, &self.layout).scan()?;
        self.state = Some(state);

        Ok(state)
    }

    /// Writes `payload` as the newest record.
    ///
    /// # Panics
    ///
    /// Panics if wear leveling is disabled.
    pub fn push(&mut self, payload: &T) -> Result<(), StoreError<M::Error>> {
        let state = self.ring_state()?;

        if state.next_sequence == SENTINEL {
            log::error!("Sequence numbers exhausted, the ring must be wiped");
            return Err(StoreError::SequenceExhausted);
        }

        let mut buffer = [0; MAX_RECORD_SIZE];
        let bytes = RecordCodec::<T>::encode(payload, state.next_sequence, &mut buffer);

        let address = self.layout.slot_to_address(state.head);
        log::trace!(
            "Pushing sequence {} into slot {} at {:#06X}",
            state.next_sequence,
            state.head,
            address
        );
        self.medium
            .write(address, bytes)
            .map_err(StoreError::Medium)?;

        self.state = Some(state.advance(&self.layout));

        Ok(())
    }

    /// Returns the newest committed payload, or `None` if nothing was pushed yet.
    ///
    /// # Panics
    ///
    /// Panics if wear leveling is disabled.
    pub fn last(&mut self) -> Result<Option<T>, StoreError<M::Error>> {
        let state = self.ring_state()?;

        if state.is_empty() {
            return Ok(None);
        }

        self.peek(state.last).map(|record| Some(record.payload))
    }

    /// Reads and decodes the record in `slot`, without validating it.
    ///
    /// # Panics
    ///
    /// Panics if wear leveling is disabled.
    pub fn peek(&mut self, slot: u32) -> Result<Record<T>, StoreError<M::Error>> {
        self.assert_wear_leveling();

        let address = self.layout.slot_to_address(self.layout.wrap(slot));

        let mut buffer = [0; MAX_RECORD_SIZE];
        let bytes = &mut buffer[..RecordCodec::<T>::SIZE];
        self.medium
            .read(address, bytes)
            .map_err(StoreError::Medium)?;

        Ok(RecordCodec::<T>::decode(bytes))
    }

    /// Writes `payload` into slot `index % slot_count`, without sequence number or checksum.
    ///
    /// On a wear-leveled store this overwrites the payload part of a record and invalidates
    /// its checksum.
    pub fn write_mem(&mut self, index: u32, payload: &T) -> Result<(), M::Error> {
        let address = self.layout.slot_to_address(self.layout.wrap(index));

        let mut buffer = [0; MAX_PAYLOAD_SIZE];
        let bytes = &mut buffer[..T::SIZE];
        payload.write_bytes(bytes);

        self.medium.write(address, bytes)
    }

    /// Reads the payload in slot `index % slot_count`.
    pub fn read_mem(&mut self, index: u32) -> Result<T, M::Error> {
        let address = self.layout.slot_to_address(self.layout.wrap(index));

        let mut buffer = [0; MAX_PAYLOAD_SIZE];
        let bytes = &mut buffer[..T::SIZE];
        self.medium.read(address, bytes)?;

        Ok(T::read_bytes(bytes))
    }

    /// Erases the first `size` bytes of the medium.
    ///
    /// This is not limited to the range of this store. Other stores sharing the medium lose
    /// their contents, too.
    pub fn wipe(&mut self, size: u32) -> Result<(), M::Error> {
        let erased = [ERASED_BYTE; WIPE_CHUNK];

        log::debug!("Wiping {} bytes", size);
        for address in (0..size).step_by(WIPE_CHUNK) {
            let len = WIPE_CHUNK.min((size - address) as usize);
            self.medium.write(address, &erased[..len])?;
        }

        self.state = None;

        Ok(())
    }

    /// Erases the whole medium.
    pub fn wipe_all(&mut self) -> Result<(), M::Error> {
        self.wipe(self.medium_size)
    }

    /// The cached ring state, or `None` if it has not been recovered since construction or
    /// the last wipe.
    pub fn state(&self) -> Option<RingState> {
        self.state
    }

    pub fn is_wear_leveled(&self) -> bool {
        self.wear_leveling
    }

    pub fn base_address(&self) -> u32 {
        self.layout.base_address()
    }

    /// First address past this store. Another store can be placed here.
    pub fn end_address(&self) -> u32 {
        self.layout.end_address()
    }

    pub fn slot_count(&self) -> u32 {
        self.layout.slot_count()
    }

    pub fn record_size(&self) -> u32 {
        self.layout.record_size()
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    pub fn into_inner(self) -> M {
        self.medium
    }

    fn ring_state(&mut self) -> Result<RingState, StoreError<M::Error>> {
        match self.state {
            Some(state) => Ok(state),
            None => self.recover(),
        }
    }

    fn assert_wear_leveling(&self) {
        assert!(
            self.wear_leveling,
            "Store at {:#06X} is not wear-leveled",
            self.layout.base_address()
        );
    }
}
