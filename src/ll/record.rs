use core::marker::PhantomData;

use crate::payload::Payload;

/// Sequence number read from a slot that was never written.
pub const SENTINEL: u32 = u32::MAX;

/// Bytes a record adds on top of its payload: sequence number and checksum.
pub const RECORD_OVERHEAD: usize = 4 + 1;

/// The largest payload a wear-leveled store can hold.
pub const MAX_PAYLOAD_SIZE: usize = 64;

pub const MAX_RECORD_SIZE: usize = MAX_PAYLOAD_SIZE + RECORD_OVERHEAD;

/// XOR of every byte in `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}

/// A decoded wear-leveling record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record<T> {
    pub payload: T,
    pub sequence: u32,
    pub checksum: u8,
}

impl<T: Payload> Record<T> {
    /// Returns `true` if the stored checksum matches the stored payload.
    pub fn is_valid(&self) -> bool {
        let mut bytes = [0; MAX_PAYLOAD_SIZE];
        let bytes = &mut bytes[..T::SIZE];
        self.payload.write_bytes(bytes);

        checksum(bytes) == self.checksum
    }

    /// Returns `true` if the record holds a committed value.
    ///
    /// A slot carrying the sentinel sequence was never written, even if its erased bytes
    /// happen to form a matching checksum.
    pub fn is_committed(&self) -> bool {
        self.sequence != SENTINEL && self.is_valid()
    }
}

/// Fixed layout serializer for `Record<T>`:
///
/// ```text
/// | payload (T::SIZE) | sequence (u32 LE) | checksum (u8) |
/// ```
pub struct RecordCodec<T> {
    _payload: PhantomData<T>,
}

impl<T: Payload> RecordCodec<T> {
    const _CONST_CHECK: () = assert!(
        T::SIZE > 0 && T::SIZE <= MAX_PAYLOAD_SIZE,
        "Payload size must be between 1 and MAX_PAYLOAD_SIZE bytes"
    );

    /// Size of an encoded record.
    pub const SIZE: usize = {
        let () = Self::_CONST_CHECK;
        T::SIZE + RECORD_OVERHEAD
    };

    /// Offset of the sequence number within a record.
    pub const SEQUENCE_OFFSET: usize = T::SIZE;

    const CHECKSUM_OFFSET: usize = T::SIZE + 4;

    /// Encodes `payload` with `sequence` and a fresh checksum into the start of `out`, and
    /// returns the encoded bytes.
    pub fn encode<'a>(payload: &T, sequence: u32, out: &'a mut [u8; MAX_RECORD_SIZE]) -> &'a [u8] {
        let out = &mut out[..Self::SIZE];

        let (payload_bytes, tail) = out.split_at_mut(T::SIZE);
        payload.write_bytes(payload_bytes);
        let checksum = checksum(payload_bytes);

        tail[..4].copy_from_slice(&sequence.to_le_bytes());
        tail[4] = checksum;

        out
    }

    /// Decodes a record from `bytes`, which must hold at least [`Self::SIZE`] bytes.
    pub fn decode(bytes: &[u8]) -> Record<T> {
        Record {
            payload: T::read_bytes(&bytes[..T::SIZE]),
            sequence: Self::decode_sequence(&bytes[Self::SEQUENCE_OFFSET..Self::CHECKSUM_OFFSET]),
            checksum: bytes[Self::CHECKSUM_OFFSET],
        }
    }

    pub fn decode_sequence(bytes: &[u8]) -> u32 {
        let mut raw = [0; 4];
        raw.copy_from_slice(&bytes[..4]);
        u32::from_le_bytes(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_of_empty_input_is_zero() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn checksum_xors_every_byte() {
        assert_eq!(checksum(&[0x0F, 0xF0]), 0xFF);
        assert_eq!(checksum(&[0xAA, 0xAA]), 0x00);
        assert_eq!(checksum(&[0x01, 0x02, 0x04]), 0x07);
    }

    #[test]
    fn record_size_includes_sequence_and_checksum() {
        assert_eq!(RecordCodec::<u32>::SIZE, 9);
        assert_eq!(RecordCodec::<[u8; 3]>::SIZE, 8);
        assert_eq!(RecordCodec::<u32>::SEQUENCE_OFFSET, 4);
    }

    #[test]
    fn largest_payload_fills_record_buffer() {
        let payload = [0xA5; MAX_PAYLOAD_SIZE];
        let mut buffer = [0; MAX_RECORD_SIZE];
        let bytes = RecordCodec::<[u8; MAX_PAYLOAD_SIZE]>::encode(&payload, 3, &mut buffer);

        assert_eq!(bytes.len(), MAX_RECORD_SIZE);
        let record = RecordCodec::<[u8; MAX_PAYLOAD_SIZE]>::decode(bytes);
        assert_eq!(record.payload, payload);
        assert!(record.is_committed());
    }

    #[test]
    fn encoded_layout_is_contiguous() {
        let mut buffer = [0; MAX_RECORD_SIZE];
        let bytes = RecordCodec::<u16>::encode(&0x0102, 0x0A0B0C0D, &mut buffer);

        assert_eq!(bytes, &[0x02, 0x01, 0x0D, 0x0C, 0x0B, 0x0A, 0x03]);
    }

    #[test]
    fn decoded_record_matches_encoded_values() {
        let mut buffer = [0; MAX_RECORD_SIZE];
        let bytes = RecordCodec::<u32>::encode(&0xDEAD_BEEF, 42, &mut buffer);

        let record = RecordCodec::<u32>::decode(bytes);
        assert_eq!(record.payload, 0xDEAD_BEEF);
        assert_eq!(record.sequence, 42);
        assert_eq!(record.checksum, 0xDE ^ 0xAD ^ 0xBE ^ 0xEF);
        assert!(record.is_valid());
        assert!(record.is_committed());
    }

    #[test]
    fn flipped_payload_bit_invalidates_record() {
        let mut buffer = [0; MAX_RECORD_SIZE];
        RecordCodec::<u32>::encode(&7, 1, &mut buffer);
        buffer[1] ^= 0x10;

        let record = RecordCodec::<u32>::decode(&buffer);
        assert!(!record.is_valid());
    }

    #[test]
    fn erased_slot_is_never_committed() {
        let erased = [0xFF; MAX_RECORD_SIZE];

        // Odd payload sizes XOR to 0xFF, which matches the erased checksum byte
        let odd = RecordCodec::<[u8; 3]>::decode(&erased);
        assert!(odd.is_valid());
        assert!(!odd.is_committed());

        let even = RecordCodec::<u16>::decode(&erased);
        assert!(!even.is_valid());
        assert_eq!(even.sequence, SENTINEL);
    }
}
