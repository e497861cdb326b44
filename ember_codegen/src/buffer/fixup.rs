use crate::object::ObjectRef;
use crate::region::MemoryRegion;

use alloc::vec::Vec;

/// Deferred patch, applied to the final region during finalize.
///
/// The position is recorded relative to the start of the buffer when
/// the fixup is created, so buffer growth never invalidates it.
pub struct Fixup
{
    position: usize,
    payload: FixupPayload,
}

/// What a fixup writes at its position.
pub enum FixupPayload
{
    /// Embed the bits of a runtime object reference.
    Object(ObjectRef),
}

impl Fixup
{
    pub (super) fn new(position: usize, payload: FixupPayload) -> Self
    {
        Self{position, payload}
    }

    /// Offset the patch applies at, relative to the start of the code.
    pub fn position(&self) -> usize
    {
        self.position
    }

    /// Apply the patch to the final region.
    ///
    /// The offsets of embedded object references are collected into
    /// `pointer_offsets`; the owning code object registers them with
    /// the collector once it has taken ownership of the region.
    pub (super) fn process(
        &self,
        region: &mut MemoryRegion,
        pointer_offsets: &mut Vec<usize>,
    )
    {
        match self.payload {
            FixupPayload::Object(object) => {
                region.store_u64(self.position, object.bits());
                pointer_offsets.push(self.position);
            },
        }
    }
}

#[cfg(test)]
mod tests
{
    use crate::arena::Arena;
    use crate::buffer::CodeBuffer;
    use crate::buffer::WORD_SIZE;
    use crate::object::ObjectRef;
    use crate::object::RefFlags;
    use crate::region::MemoryRegion;

    use alloc::vec;
    use alloc::vec::Vec;

    fn embeddable(bits: u64) -> ObjectRef
    {
        ObjectRef::new(
            bits,
            RefFlags::LONG_LIVED | RefFlags::RELOCATION_TRACKED,
        )
    }

    #[test]
    fn fixups_patch_their_offsets()
    {
        let arena = Arena::new();
        let mut buffer = CodeBuffer::new(&arena);

        let mut expected = Vec::new();
        for i in 0 .. 8u64 {
            buffer.emit_u8(0x90);
            expected.push((buffer.size(), 0x1000 + i));
            buffer.emit_object_reference(embeddable(0x1000 + i));
        }

        let size = buffer.size();
        let mut storage = vec![0u8; size];
        let mut region = MemoryRegion::new(&mut storage);
        let mut pointer_offsets = buffer.finalize(&mut region);

        for &(position, bits) in &expected {
            assert_eq!(region.load_u64(position), bits);
        }

        // Instruction bytes around the references are untouched.
        for &(position, _) in &expected {
            assert_eq!(region.as_bytes()[position - 1], 0x90);
        }

        let mut expected_offsets: Vec<usize> =
            expected.iter().map(|&(position, _)| position).collect();
        expected_offsets.sort_unstable();
        pointer_offsets.sort_unstable();
        assert_eq!(pointer_offsets, expected_offsets);
    }

    #[test]
    fn fixups_survive_growth()
    {
        let arena = Arena::new();
        let mut buffer = CodeBuffer::new(&arena);

        let position = buffer.size();
        buffer.emit_object_reference(embeddable(0xDEAD_BEEF));

        // Push the buffer through several growth steps.
        for _ in 0 .. 20_000 {
            buffer.emit_u8(0xCC);
        }

        let size = buffer.size();
        assert_eq!(size, position + WORD_SIZE + 20_000);

        let mut storage = vec![0u8; size];
        let mut region = MemoryRegion::new(&mut storage);
        let pointer_offsets = buffer.finalize(&mut region);

        assert_eq!(region.load_u64(position), 0xDEAD_BEEF);
        assert_eq!(pointer_offsets, vec![position]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn untracked_reference_is_rejected()
    {
        let arena = Arena::new();
        let mut buffer = CodeBuffer::new(&arena);
        buffer.emit_object_reference(
            ObjectRef::new(0x1000, RefFlags::LONG_LIVED),
        );
    }
}
