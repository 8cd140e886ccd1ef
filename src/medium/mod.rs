#[cfg(feature = "at24cx")]
pub mod at24cx;
pub mod ram;

/// The value every byte of the medium holds after erasing.
pub const ERASED_BYTE: u8 = 0xFF;

/// Byte-addressable storage with random-access reads and writes.
pub trait ByteMedium {
    type Error: core::fmt::Debug;

    /// Fills `data` with the bytes starting at `address`.
    fn read(&mut self, address: u32, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes `data` starting at `address`. The write either completes or returns an error.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), Self::Error>;
}

impl<M> ByteMedium for &mut M
where
    M: ByteMedium,
{
    type Error = M::Error;

    fn read(&mut self, address: u32, data: &mut [u8]) -> Result<(), Self::Error> {
        M::read(self, address, data)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), Self::Error> {
        M::write(self, address, data)
    }
}
