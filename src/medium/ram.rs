use crate::medium::{ByteMedium, ERASED_BYTE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfBounds;

/// In-memory medium, starting out fully erased.
pub struct RamMedium<const SIZE: usize> {
    pub(crate) data: [u8; SIZE],
}

impl<const SIZE: usize> Default for RamMedium<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> RamMedium<SIZE> {
    pub const fn new() -> Self {
        Self {
            data: [ERASED_BYTE; SIZE],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Direct access to the contents, bypassing the medium interface. Useful to simulate
    /// interrupted writes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn range(address: u32, len: usize) -> Result<core::ops::Range<usize>, OutOfBounds> {
        let start = address as usize;
        match start.checked_add(len) {
            Some(end) if end <= SIZE => Ok(start..end),
            _ => Err(OutOfBounds),
        }
    }
}

impl<const SIZE: usize> ByteMedium for RamMedium<SIZE> {
    type Error = OutOfBounds;

    fn read(&mut self, address: u32, data: &mut [u8]) -> Result<(), OutOfBounds> {
        let range = Self::range(address, data.len())?;
        data.copy_from_slice(&self.data[range]);

        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), OutOfBounds> {
        let range = Self::range(address, data.len())?;
        self.data[range].copy_from_slice(data);

        Ok(())
    }
}
