use crate::arena::Arena;
use crate::object::ObjectRef;
use crate::region::MemoryRegion;
use super::Fixup;
use super::FixupPayload;

use alloc::vec::Vec;
use core::cmp;
use core::ptr::NonNull;
use core::ptr;
use core::slice;

const KB: usize = 1024;
const MB: usize = KB * KB;

/// Capacity of a freshly created buffer.
const INITIAL_CAPACITY: usize = 4 * KB;

/// Width in bytes of an embedded object reference.
pub const WORD_SIZE: usize = 8;

/// Room that the limit always leaves before the end of the storage.
///
/// One atomic emission (a single instruction, or one embedded
/// reference) must never need more than this many bytes.
pub const MINIMUM_GAP: usize = 32;

/// Growable byte buffer that machine code is emitted into.
///
/// The buffer is owned by a single code-generation task for its whole
/// lifetime and is consumed exactly once by
/// [`finalize`][`CodeBuffer::finalize`].
/// Storage comes from an [`Arena`] and is never freed individually;
/// the arena reclaims everything when its scope ends.
///
/// # Examples
///
/// ```
/// use ember_codegen::arena::Arena;
/// use ember_codegen::buffer::CodeBuffer;
/// use ember_codegen::region::MemoryRegion;
///
/// let arena = Arena::new();
/// let mut buffer = CodeBuffer::new(&arena);
/// buffer.emit_bytes(&[0x55, 0x48, 0x89, 0xE5]);
///
/// let mut storage = vec![0u8; buffer.size()];
/// let mut region = MemoryRegion::new(&mut storage);
/// let pointer_offsets = buffer.finalize(&mut region);
///
/// assert_eq!(region.as_bytes(), &[0x55, 0x48, 0x89, 0xE5]);
/// assert!(pointer_offsets.is_empty());
/// ```
pub struct CodeBuffer<'z>
{
    arena: &'z Arena,

    /// Start of the backing storage.
    /// Replaced on growth; all other state is kept as offsets from
    /// this base, so growth moves nothing else.
    contents: NonNull<u8>,

    /// Size of the backing storage.
    capacity: usize,

    /// Write position, as an offset from `contents`.
    /// Monotonically non-decreasing during emission.
    pub (super) cursor: usize,

    /// Offset past which an emission must first grow the buffer.
    /// Always `capacity - MINIMUM_GAP`.
    pub (super) limit: usize,

    /// Pending patches, most recently added last.
    /// Applied newest-first when the buffer is finalized.
    fixups: Vec<Fixup>,

    /// Offsets of embedded object references, filled during finalize.
    pointer_offsets: Vec<usize>,

    /// Whether a capacity reservation is currently held.
    #[cfg(debug_assertions)]
    pub (super) has_reservation: bool,

    /// Value of `cursor` when the current reservation was acquired.
    #[cfg(debug_assertions)]
    pub (super) reserved_cursor: usize,
}

impl<'z> CodeBuffer<'z>
{
    /// Create an empty buffer backed by the given arena.
    pub fn new(arena: &'z Arena) -> Self
    {
        let this = Self{
            arena,
            contents: arena.allocate(INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
            cursor: 0,
            limit: compute_limit(INITIAL_CAPACITY),
            fixups: Vec::new(),
            pointer_offsets: Vec::with_capacity(16),
            #[cfg(debug_assertions)]
            has_reservation: false,
            #[cfg(debug_assertions)]
            reserved_cursor: 0,
        };
        this.verify();
        this
    }

    /// Number of bytes emitted so far.
    pub fn size(&self) -> usize
    {
        self.cursor
    }

    /// Size of the backing storage.
    pub fn capacity(&self) -> usize
    {
        self.capacity
    }

    /// Append bytes at the cursor, growing the buffer as needed.
    pub fn emit_bytes(&mut self, bytes: &[u8])
    {
        while self.cursor + bytes.len() > self.limit {
            self.grow();
        }

        // SAFETY: The loop above guarantees that
        // `cursor + bytes.len() <= limit < capacity`.
        unsafe {
            ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                self.contents.as_ptr().add(self.cursor),
                bytes.len(),
            );
        }

        self.cursor += bytes.len();
        self.verify();
    }

    /// Append a single byte at the cursor.
    pub fn emit_u8(&mut self, value: u8)
    {
        self.emit_bytes(&[value]);
    }

    /// Append a 16-bit value at the cursor, in native byte order.
    pub fn emit_u16(&mut self, value: u16)
    {
        self.emit_bytes(&value.to_ne_bytes());
    }

    /// Append a 32-bit value at the cursor, in native byte order.
    pub fn emit_u32(&mut self, value: u32)
    {
        self.emit_bytes(&value.to_ne_bytes());
    }

    /// Append a 64-bit value at the cursor, in native byte order.
    pub fn emit_u64(&mut self, value: u64)
    {
        self.emit_bytes(&value.to_ne_bytes());
    }

    /// Read back a byte that was emitted at the given offset.
    ///
    /// # Panics
    ///
    /// Panics if the offset has not been emitted to yet.
    pub fn load_u8(&self, position: usize) -> u8
    {
        assert!(position < self.cursor);

        // SAFETY: Everything below the cursor is initialized.
        unsafe { *self.contents.as_ptr().add(position) }
    }

    /// Read back a word that was emitted at the given offset.
    ///
    /// # Panics
    ///
    /// Panics if the word has not been fully emitted yet.
    pub fn load_u64(&self, position: usize) -> u64
    {
        assert!(position + WORD_SIZE <= self.cursor);

        // SAFETY: Everything below the cursor is initialized,
        // and reading a word may be unaligned.
        unsafe {
            ptr::read_unaligned(
                self.contents.as_ptr().add(position) as *const u64,
            )
        }
    }

    /// Overwrite a word that was emitted at the given offset.
    ///
    /// Used for back-patching, for example branch targets whose
    /// distance is only known once the branch target is bound.
    ///
    /// # Panics
    ///
    /// Panics if the word has not been fully emitted yet.
    pub fn store_u64(&mut self, position: usize, value: u64)
    {
        assert!(position + WORD_SIZE <= self.cursor);

        // SAFETY: Everything below the cursor is initialized,
        // and writing a word may be unaligned.
        unsafe {
            ptr::write_unaligned(
                self.contents.as_ptr().add(position) as *mut u64,
                value,
            );
        }
    }

    /// Embed a reference to a runtime object at the cursor.
    ///
    /// The reference bits are not written now; the final address of the
    /// code is not known until the buffer is finalized. Instead a fixup
    /// records the current offset and the reference, and a word-sized
    /// gap is reserved in the byte stream.
    ///
    /// The referenced object must outlive the generated code and must
    /// be tracked by the relocating collector. Both are checked in
    /// debug builds only.
    pub fn emit_object_reference(&mut self, object: ObjectRef)
    {
        debug_assert!(object.is_long_lived());
        debug_assert!(object.is_relocation_tracked());

        let position = self.cursor;
        self.fixups.push(Fixup::new(position, FixupPayload::Object(object)));

        // Reserve the gap; finalize patches it.
        self.emit_u64(0);
    }

    /// Commit the emitted bytes into their final region.
    ///
    /// The bytes `[0, size)` are copied into the region, then the
    /// pending fixups are applied to the region, newest first. Each
    /// fixup patches a distinct offset, so the order has no observable
    /// effect on the final bytes.
    ///
    /// Returns the offsets of all embedded object references, for the
    /// owning code object to register with the collector.
    ///
    /// Finalization consumes the buffer. Emitting afterwards, or
    /// finalizing twice, is rejected at compile time:
    ///
    /// ```compile_fail
    /// use ember_codegen::arena::Arena;
    /// use ember_codegen::buffer::CodeBuffer;
    /// use ember_codegen::region::MemoryRegion;
    ///
    /// let arena = Arena::new();
    /// let mut buffer = CodeBuffer::new(&arena);
    /// buffer.emit_u8(0x90);
    ///
    /// let mut storage = [0u8; 1];
    /// buffer.finalize(&mut MemoryRegion::new(&mut storage));
    /// buffer.emit_u8(0x90); // the buffer is spent
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the region is smaller than [`size`][`Self::size`].
    pub fn finalize(mut self, region: &mut MemoryRegion) -> Vec<usize>
    {
        assert!(self.cursor <= region.len());

        // SAFETY: Everything below the cursor is initialized.
        let emitted = unsafe {
            slice::from_raw_parts(self.contents.as_ptr(), self.cursor)
        };
        region.copy_from(0, emitted);

        for fixup in self.fixups.iter().rev() {
            fixup.process(region, &mut self.pointer_offsets);
        }

        self.pointer_offsets
    }

    /// Replace the backing storage with a larger block.
    pub (super) fn grow(&mut self)
    {
        let old_capacity = self.capacity;
        let new_capacity = match grown_capacity(old_capacity) {
            Some(new_capacity) => new_capacity,
            None => panic!("overflow while growing the code buffer"),
        };

        // Carry over everything emitted so far.
        // The old block is not freed here; the arena reclaims it
        // together with everything else when its scope ends.
        let new_contents = self.arena.allocate(new_capacity);

        // SAFETY: Both blocks hold at least `cursor` bytes,
        // and separate arena blocks never overlap.
        unsafe {
            ptr::copy_nonoverlapping(
                self.contents.as_ptr(),
                new_contents.as_ptr(),
                self.cursor,
            );
        }

        // The cursor and the fixup positions are offsets from the
        // start of the storage and survive the move unchanged.
        self.contents = new_contents;
        self.capacity = new_capacity;
        self.limit = compute_limit(new_capacity);
        self.verify();
    }

    /// Check the buffer invariants. Debug builds only.
    pub (super) fn verify(&self)
    {
        debug_assert!(self.cursor <= self.capacity);
        debug_assert_eq!(self.limit, self.capacity - MINIMUM_GAP);
    }
}

/// Capacity after one growth step: double the old capacity, but never
/// add more than one megabyte. Returns [`None`] when the computation
/// wraps around the integer range.
fn grown_capacity(old_capacity: usize) -> Option<usize>
{
    let new_capacity = cmp::min(
        old_capacity.wrapping_mul(2),
        old_capacity.wrapping_add(MB),
    );

    if new_capacity < old_capacity {
        None
    } else {
        Some(new_capacity)
    }
}

fn compute_limit(capacity: usize) -> usize
{
    capacity - MINIMUM_GAP
}
