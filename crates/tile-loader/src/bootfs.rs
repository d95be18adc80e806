//! Boot filesystem directory.
//!
//! A flat directory at flash offset 0 maps symbolic tags to image extents.
//! Entries are fixed-size and little-endian:
//!
//! ```text
//! offset  size  field
//! ──────  ────  ─────────────────────────────────────────
//!      0     8  tag, NUL-padded ASCII
//!      8     4  image offset in flash
//!     12     4  image length in bytes
//!     16     4  flags (bit 0: executable)
//!     20     4  reserved, written as zero
//! ```
//!
//! The directory ends at the first entry whose tag starts with `0x00`
//! (builder output) or `0xFF` (erased flash), or after [`MAX_ENTRIES`].
//! Tag matching is exact and case-sensitive.

use crate::error::{LoadError, Result};
use crate::flash::FlashRead;
use bytes::Bytes;

/// Maximum tag length in bytes.
pub const TAG_SIZE: usize = 8;

/// Encoded size of one directory entry.
pub const ENTRY_SIZE: usize = 24;

/// Directory capacity.
pub const MAX_ENTRIES: usize = 64;

/// Flash bytes reserved for the directory.
pub const DIRECTORY_SIZE: usize = ENTRY_SIZE * MAX_ENTRIES;

/// Flag bit: image is executable code rather than register data.
pub const FLAG_EXECUTABLE: u32 = 1 << 0;

/// Where one image lives in flash. Immutable once obtained; scoped to one
/// transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Tag the image was found under.
    pub tag: String,
    /// Byte offset of the image in flash.
    pub flash_offset: u64,
    /// Image length in bytes.
    pub byte_length: u64,
    /// Entry flags.
    pub flags: u32,
}

/// Resolves a symbolic tag to an image extent.
pub trait ImageLocator {
    /// Look up `tag` in the directory.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::TagNotFound`] when the tag is absent.
    fn find(&self, tag: &str) -> Result<ImageDescriptor>;
}

/// Boot filesystem directory, scanned once from flash.
#[derive(Debug, Clone)]
pub struct BootFs {
    entries: Vec<ImageDescriptor>,
}

impl BootFs {
    /// Scan the directory from the start of flash.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory region cannot be read.
    pub fn scan<F: FlashRead>(flash: &F) -> Result<Self> {
        let mut entries = Vec::new();
        let mut raw = [0u8; ENTRY_SIZE];

        for index in 0..MAX_ENTRIES {
            flash.read((index * ENTRY_SIZE) as u64, &mut raw)?;
            if raw[0] == 0x00 || raw[0] == 0xFF {
                break;
            }

            let tag_end = raw[..TAG_SIZE].iter().position(|&b| b == 0).unwrap_or(TAG_SIZE);
            let tag = String::from_utf8_lossy(&raw[..tag_end]).into_owned();
            let offset = u32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]);
            let length = u32::from_le_bytes([raw[12], raw[13], raw[14], raw[15]]);
            let flags = u32::from_le_bytes([raw[16], raw[17], raw[18], raw[19]]);

            entries.push(ImageDescriptor {
                tag,
                flash_offset: u64::from(offset),
                byte_length: u64::from(length),
                flags,
            });
        }

        tracing::debug!("Boot filesystem: {} entries", entries.len());
        Ok(Self { entries })
    }

    /// All directory entries in flash order.
    #[must_use]
    pub fn entries(&self) -> &[ImageDescriptor] {
        &self.entries
    }
}

impl ImageLocator for BootFs {
    fn find(&self, tag: &str) -> Result<ImageDescriptor> {
        self.entries
            .iter()
            .find(|e| e.tag == tag)
            .cloned()
            .ok_or_else(|| LoadError::tag_not_found(tag))
    }
}

/// Builds a flash byte image containing a directory and its images.
#[derive(Debug, Default)]
pub struct BootFsBuilder {
    images: Vec<(String, u32, Vec<u8>)>,
}

impl BootFsBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image under `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidArgument`] if the tag is empty, longer
    /// than [`TAG_SIZE`], or already present, or if the directory is full.
    pub fn add(&mut self, tag: &str, flags: u32, data: Vec<u8>) -> Result<&mut Self> {
        if tag.is_empty() || tag.len() > TAG_SIZE {
            return Err(LoadError::invalid_argument(format!(
                "tag must be 1..={TAG_SIZE} bytes, got {:?}",
                tag
            )));
        }
        if self.images.iter().any(|(t, _, _)| t == tag) {
            return Err(LoadError::invalid_argument(format!("duplicate tag {tag:?}")));
        }
        if self.images.len() == MAX_ENTRIES {
            return Err(LoadError::invalid_argument("directory full"));
        }
        self.images.push((tag.to_owned(), flags, data));
        Ok(self)
    }

    /// Pack directory and images into one flash byte image.
    #[must_use]
    pub fn build(&self) -> Bytes {
        let payload: usize = self.images.iter().map(|(_, _, d)| (d.len() + 3) & !3).sum();
        let mut out = vec![0u8; DIRECTORY_SIZE + payload];

        let mut cursor = DIRECTORY_SIZE;
        for (index, (tag, flags, data)) in self.images.iter().enumerate() {
            let entry = &mut out[index * ENTRY_SIZE..(index + 1) * ENTRY_SIZE];
            entry[..tag.len()].copy_from_slice(tag.as_bytes());
            entry[8..12].copy_from_slice(&u32::try_from(cursor).expect("flash image < 4 GB").to_le_bytes());
            entry[12..16].copy_from_slice(&u32::try_from(data.len()).expect("image < 4 GB").to_le_bytes());
            entry[16..20].copy_from_slice(&flags.to_le_bytes());

            out[cursor..cursor + data.len()].copy_from_slice(data);
            cursor += (data.len() + 3) & !3; // keep image starts 4-byte aligned
        }

        Bytes::from(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::MemFlash;

    #[test]
    fn pack_and_find() {
        let mut builder = BootFsBuilder::new();
        builder.add("serdes", 0, vec![1, 2, 3, 4]).unwrap();
        builder.add("ethfw", FLAG_EXECUTABLE, vec![5; 100]).unwrap();
        let flash = MemFlash::new(builder.build());

        let fs = BootFs::scan(&flash).unwrap();
        assert_eq!(fs.entries().len(), 2);

        let fd = fs.find("ethfw").unwrap();
        assert_eq!(fd.byte_length, 100);
        assert_eq!(fd.flags, FLAG_EXECUTABLE);

        let mut data = vec![0u8; 100];
        flash.read(fd.flash_offset, &mut data).unwrap();
        assert!(data.iter().all(|&b| b == 5));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut builder = BootFsBuilder::new();
        builder.add("serdes", 0, vec![0; 8]).unwrap();
        let fs = BootFs::scan(&MemFlash::new(builder.build())).unwrap();

        assert!(fs.find("serdes").is_ok());
        assert!(matches!(fs.find("SERDES"), Err(LoadError::TagNotFound { .. })));
        assert!(matches!(fs.find("missing"), Err(LoadError::TagNotFound { .. })));
    }

    #[test]
    fn oversized_tag_rejected() {
        let mut builder = BootFsBuilder::new();
        assert!(matches!(
            builder.add("way-too-long-tag", 0, vec![]),
            Err(LoadError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn erased_flash_scans_empty() {
        let flash = MemFlash::new(vec![0xFF; DIRECTORY_SIZE]);
        let fs = BootFs::scan(&flash).unwrap();
        assert!(fs.entries().is_empty());
    }
}
