/// A value with a fixed-size binary representation.
///
/// The store derives its record size from [`Payload::SIZE`], and the record checksum is
/// computed over the bytes produced by [`Payload::write_bytes`].
///
/// Records are staged in fixed stack buffers, so `SIZE` must lie between 1 and
/// [`MAX_PAYLOAD_SIZE`](crate::ll::record::MAX_PAYLOAD_SIZE) bytes. Larger payloads fail to
/// compile when a store is created for them.
pub trait Payload: Sized {
    /// Number of bytes in the serialized form.
    const SIZE: usize;

    /// Serializes `self` into `out`, which is exactly [`Self::SIZE`] bytes long.
    fn write_bytes(&self, out: &mut [u8]);

    /// Deserializes a value from `bytes`, which is exactly [`Self::SIZE`] bytes long.
    fn read_bytes(bytes: &[u8]) -> Self;
}

macro_rules! impl_le_payload {
    ($($ty:ty),+) => {
        $(
            impl Payload for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn write_bytes(&self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }

                fn read_bytes(bytes: &[u8]) -> Self {
                    let mut raw = [0; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )+
    };
}

impl_le_payload!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Payload for bool {
    const SIZE: usize = 1;

    fn write_bytes(&self, out: &mut [u8]) {
        out[0] = *self as u8;
    }

    fn read_bytes(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

impl<const N: usize> Payload for [u8; N] {
    const SIZE: usize = N;

    fn write_bytes(&self, out: &mut [u8]) {
        out.copy_from_slice(self);
    }

    fn read_bytes(bytes: &[u8]) -> Self {
        let mut raw = [0; N];
        raw.copy_from_slice(bytes);
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_little_endian() {
        let mut out = [0; 4];
        0x1234_5678u32.write_bytes(&mut out);
        assert_eq!(out, [0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn float_bits_are_preserved() {
        let mut out = [0; 4];
        (-1.5f32).write_bytes(&mut out);
        assert_eq!(f32::read_bytes(&out).to_bits(), (-1.5f32).to_bits());
    }

    #[test]
    fn erased_bool_reads_as_true() {
        assert!(bool::read_bytes(&[0xFF]));
        assert!(!bool::read_bytes(&[0x00]));
    }

    #[test]
    fn sizes_match_representation() {
        assert_eq!(<u8 as Payload>::SIZE, 1);
        assert_eq!(<i16 as Payload>::SIZE, 2);
        assert_eq!(<f64 as Payload>::SIZE, 8);
        assert_eq!(<[u8; 12] as Payload>::SIZE, 12);
    }
}
