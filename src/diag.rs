use crate::medium::ByteMedium;

/// Medium wrapper that counts the transfers passing through it.
pub struct Counters<M>
where
    M: ByteMedium,
{
    medium: M,
    pub read_count: usize,
    pub write_count: usize,
    pub bytes_written: usize,
}

impl<M> Counters<M>
where
    M: ByteMedium,
{
    pub const fn new(medium: M) -> Self {
        Self {
            medium,
            read_count: 0,
            write_count: 0,
            bytes_written: 0,
        }
    }

    pub fn reset(&mut self) {
        self.read_count = 0;
        self.write_count = 0;
        self.bytes_written = 0;
    }

    pub fn inner(&self) -> &M {
        &self.medium
    }

    pub fn into_inner(self) -> M {
        self.medium
    }
}

impl<M> ByteMedium for Counters<M>
where
    M: ByteMedium,
{
    type Error = M::Error;

    fn read(&mut self, address: u32, data: &mut [u8]) -> Result<(), Self::Error> {
        self.read_count = self.read_count.saturating_add(1);
        self.medium.read(address, data)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<(), Self::Error> {
        self.write_count = self.write_count.saturating_add(1);
        self.bytes_written = self.bytes_written.saturating_add(data.len());
        self.medium.write(address, data)
    }
}
