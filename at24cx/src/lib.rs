//! Blocking driver for AT24Cxx serial EEPROMs with 16-bit memory addresses.

#![cfg_attr(not(test), no_std)]

use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, Operation},
};

/// Device address with all address pins (A2..A0) tied low.
const BASE_DEVICE_ADDRESS: u8 = 0x50;

// The datasheets specify t_WR <= 5ms (10ms for older parts)
const WRITE_POLL_INTERVAL_US: u32 = 1_000;
const WRITE_POLL_ATTEMPTS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    At24c32,
    At24c64,
    At24c128,
    At24c256,
    At24c512,
}

impl Variant {
    /// Size of the device in bytes.
    pub const fn capacity(self) -> u32 {
        match self {
            Variant::At24c32 => 4 * 1024,
            Variant::At24c64 => 8 * 1024,
            Variant::At24c128 => 16 * 1024,
            Variant::At24c256 => 32 * 1024,
            Variant::At24c512 => 64 * 1024,
        }
    }

    /// Size of a write page in bytes. A single write must not cross a page boundary.
    pub const fn page_size(self) -> u32 {
        match self {
            Variant::At24c32 | Variant::At24c64 => 32,
            Variant::At24c128 | Variant::At24c256 => 64,
            Variant::At24c512 => 128,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    I2c(E),
    /// The access extends past the end of the device.
    OutOfRange,
    /// The device did not finish its internal write cycle in time.
    WriteTimeout,
}

pub struct At24cx<I, D> {
    i2c: I,
    delay: D,
    device_address: u8,
    variant: Variant,
}

impl<I, D> At24cx<I, D> {
    /// `index` is the state of the A2..A0 address pins.
    pub const fn new(i2c: I, delay: D, index: u8, variant: Variant) -> Self {
        Self {
            i2c,
            delay,
            device_address: BASE_DEVICE_ADDRESS | (index & 0b111),
            variant,
        }
    }

    pub fn device_address(&self) -> u8 {
        self.device_address
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn capacity(&self) -> u32 {
        self.variant.capacity()
    }

    pub fn into_inner(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn in_range(&self, address: u32, len: usize) -> bool {
        let end = u32::try_from(len)
            .ok()
            .and_then(|len| address.checked_add(len));

        matches!(end, Some(end) if end <= self.capacity())
    }
}

impl<I, D> At24cx<I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Reads `data.len()` bytes starting at `address`.
    pub fn read(&mut self, address: u32, data: &mut [u8]) -> Result<(), Error<I::Error>> {
        if !self.in_range(address, data.len()) {
            return Err(Error::OutOfRange);
        }
        if data.is_empty() {
            return Ok(());
        }

        let address_bytes = (address as u16).to_be_bytes();
        self.i2c
            .transaction(
                self.device_address,
                &mut [Operation::Write(&address_bytes), Operation::Read(data)],
            )
            .map_err(Error::I2c)
    }

    /// Writes `data` starting at `address`, one page at a time. Returns when the device has
    /// finished programming the last page.
    pub fn write(&mut self, mut address: u32, mut data: &[u8]) -> Result<(), Error<I::Error>> {
        if !self.in_range(address, data.len()) {
            return Err(Error::OutOfRange);
        }

        let page_size = self.variant.page_size();
        while !data.is_empty() {
            let page_remaining = (page_size - address % page_size) as usize;
            let (chunk, rest) = data.split_at(page_remaining.min(data.len()));

            log::trace!("Writing {} bytes at {:#06X}", chunk.len(), address);

            let address_bytes = (address as u16).to_be_bytes();
            self.i2c
                .transaction(
                    self.device_address,
                    &mut [Operation::Write(&address_bytes), Operation::Write(chunk)],
                )
                .map_err(Error::I2c)?;

            self.wait_for_write_cycle()?;

            address += chunk.len() as u32;
            data = rest;
        }

        Ok(())
    }

    /// Polls the device until it acknowledges its address again.
    fn wait_for_write_cycle(&mut self) -> Result<(), Error<I::Error>> {
        for _ in 0..WRITE_POLL_ATTEMPTS {
            self.delay.delay_us(WRITE_POLL_INTERVAL_US);
            if self.i2c.write(self.device_address, &[]).is_ok() {
                return Ok(());
            }
        }

        log::warn!("EEPROM at {:#04X} did not finish writing", self.device_address);
        Err(Error::WriteTimeout)
    }
}
