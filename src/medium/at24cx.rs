use at24cx::{At24cx, Error};
use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::medium::ByteMedium;

impl<I, D> ByteMedium for At24cx<I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = Error<I::Error>;

    fn read(&mut self, address: u32, data: &mut [u8]) -> Result<(), Self::Error> {
        At24cx::read(self, address, data)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), Self::Error> {
        At24cx::write(self, address, data)
    }
}
