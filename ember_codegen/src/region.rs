//! Destination regions for finalized code.

use core::mem::size_of;

/// Borrowed byte region with a fixed, final address.
///
/// A finalized code buffer is copied into a memory region, and fixups
/// patch the region afterwards. Multi-byte accesses use the native
/// byte order of the host, like the rest of the runtime.
pub struct MemoryRegion<'m>
{
    bytes: &'m mut [u8],
}

impl<'m> MemoryRegion<'m>
{
    /// Wrap the given bytes in a region.
    pub fn new(bytes: &'m mut [u8]) -> Self
    {
        Self{bytes}
    }

    /// Size of the region in bytes.
    pub fn len(&self) -> usize
    {
        self.bytes.len()
    }

    /// Whether the region has no bytes.
    pub fn is_empty(&self) -> bool
    {
        self.bytes.is_empty()
    }

    /// View the whole region.
    pub fn as_bytes(&self) -> &[u8]
    {
        self.bytes
    }

    /// Copy `source` into the region, starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the source does not fit.
    pub fn copy_from(&mut self, offset: usize, source: &[u8])
    {
        self.bytes[offset .. offset + source.len()].copy_from_slice(source);
    }

    /// Write a word at the given offset.
    ///
    /// # Panics
    ///
    /// Panics if the word does not fit.
    pub fn store_u64(&mut self, offset: usize, value: u64)
    {
        self.copy_from(offset, &value.to_ne_bytes());
    }

    /// Read back a word from the given offset.
    ///
    /// # Panics
    ///
    /// Panics if the word is out of bounds.
    pub fn load_u64(&self, offset: usize) -> u64
    {
        let mut word = [0u8; size_of::<u64>()];
        word.copy_from_slice(&self.bytes[offset .. offset + size_of::<u64>()]);
        u64::from_ne_bytes(word)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn store_load_roundtrip()
    {
        let mut bytes = [0u8; 16];
        let mut region = MemoryRegion::new(&mut bytes);
        region.store_u64(3, 0x1122_3344_5566_7788);
        assert_eq!(region.load_u64(3), 0x1122_3344_5566_7788);
    }

    #[test]
    #[should_panic]
    fn store_out_of_bounds_panics()
    {
        let mut bytes = [0u8; 8];
        let mut region = MemoryRegion::new(&mut bytes);
        region.store_u64(1, 0);
    }
}
