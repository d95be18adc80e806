//! Register-record wire format.
//!
//! SerDes configuration images are dense arrays of little-endian
//! `(addr, data)` pairs replayed in order against the CMN register block.
//! The address in each record is window-relative, not absolute.

/// One `(addr, data)` register write, as stored in flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterRecord {
    /// Window-relative register address.
    pub addr: u32,
    /// Value to write.
    pub data: u32,
}

impl RegisterRecord {
    /// Encoded size of one record in bytes.
    pub const SIZE: usize = 8;

    /// Decode a record from its little-endian wire form.
    #[must_use]
    pub fn from_le_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self {
            addr: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            data: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Encode a record to its little-endian wire form.
    #[must_use]
    pub fn to_le_bytes(self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(&self.addr.to_le_bytes());
        out[4..].copy_from_slice(&self.data.to_le_bytes());
        out
    }

    /// Iterate the complete records in a buffer, in array order.
    ///
    /// A trailing partial record (buffer length not a multiple of
    /// [`Self::SIZE`]) is dropped, never decoded.
    pub fn iter(buf: &[u8]) -> impl Iterator<Item = Self> + '_ {
        buf.chunks_exact(Self::SIZE).map(|chunk| {
            let mut bytes = [0u8; Self::SIZE];
            bytes.copy_from_slice(chunk);
            Self::from_le_bytes(bytes)
        })
    }
}
