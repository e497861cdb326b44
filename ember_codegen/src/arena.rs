//! Scope-bound storage for code buffers.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::ptr::NonNull;

/// Allocator whose blocks are all freed together when it is dropped.
///
/// A code buffer requests storage from an arena and never frees it;
/// in particular, the storage a buffer abandons when it grows stays
/// alive until the arena goes out of scope.
/// The arena is expected to live for the duration of one compilation,
/// so nothing may hold a pointer into it past that scope.
pub struct Arena
{
    /// Blocks handed out so far.
    /// The blocks are boxed, so pushing more blocks onto the
    /// vector never moves the storage of earlier ones.
    blocks: RefCell<Vec<Box<[u8]>>>,
}

impl Arena
{
    /// Create an arena with no blocks.
    pub fn new() -> Self
    {
        Self{blocks: RefCell::new(Vec::new())}
    }

    /// Allocate a zero-initialized block of the given size.
    ///
    /// The returned pointer remains valid until the arena is dropped.
    pub fn allocate(&self, size: usize) -> NonNull<u8>
    {
        // TODO: Replace this with a pointer bump allocation.
        let mut block = vec![0u8; size].into_boxed_slice();
        let pointer = block.as_mut_ptr();
        self.blocks.borrow_mut().push(block);

        // SAFETY: A boxed slice never has a null data pointer.
        unsafe { NonNull::new_unchecked(pointer) }
    }
}

impl Default for Arena
{
    fn default() -> Self
    {
        Self::new()
    }
}
