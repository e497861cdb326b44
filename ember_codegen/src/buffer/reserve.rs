use super::CodeBuffer;
use super::MINIMUM_GAP;

use scopeguard::guard;

impl<'z> CodeBuffer<'z>
{
    /// Run `emit` with room reserved for one atomic emission.
    ///
    /// On entry the buffer grows if the cursor has reached the limit,
    /// which guarantees at least [`MINIMUM_GAP`] bytes of room. The
    /// closure must not emit more than that in total, and reservations
    /// must not nest; both are programming errors and are checked in
    /// debug builds only.
    ///
    /// # Examples
    ///
    /// ```
    /// use ember_codegen::arena::Arena;
    /// use ember_codegen::buffer::CodeBuffer;
    ///
    /// let arena = Arena::new();
    /// let mut buffer = CodeBuffer::new(&arena);
    /// buffer.with_reserved_capacity(|buffer| {
    ///     buffer.emit_u8(0x48);
    ///     buffer.emit_u8(0xC7);
    ///     buffer.emit_u8(0xC0);
    ///     buffer.emit_u32(7);
    /// });
    /// assert_eq!(buffer.size(), 7);
    /// ```
    pub fn with_reserved_capacity<F, R>(&mut self, emit: F) -> R
        where F: FnOnce(&mut CodeBuffer<'z>) -> R
    {
        self.begin_reservation();
        let mut buffer = guard(self, |buffer| buffer.end_reservation());
        emit(&mut **buffer)
    }

    fn begin_reservation(&mut self)
    {
        if self.cursor >= self.limit {
            self.grow();
        }

        #[cfg(debug_assertions)]
        {
            // A reservation guarantees room for one atomic emission;
            // nesting would let two emissions share one guarantee.
            assert!(!self.has_reservation, "nested capacity reservation");
            self.has_reservation = true;
            self.reserved_cursor = self.cursor;
        }
    }

    fn end_reservation(&mut self)
    {
        #[cfg(debug_assertions)]
        {
            self.has_reservation = false;
            let emitted = self.cursor - self.reserved_cursor;
            assert!(
                emitted <= MINIMUM_GAP,
                "atomic emission exceeded the guaranteed gap",
            );
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::arena::Arena;

    #[test]
    fn reservation_guarantees_the_gap()
    {
        let arena = Arena::new();
        let mut buffer = CodeBuffer::new(&arena);

        // Push the cursor up to the limit to force entry growth.
        let gap = buffer.capacity() - MINIMUM_GAP;
        for _ in 0 .. gap {
            buffer.emit_u8(0x90);
        }

        let capacity = buffer.capacity();
        buffer.with_reserved_capacity(|buffer| {
            buffer.emit_u64(0xFFFF_FFFF_FFFF_FFFF);
        });
        assert!(buffer.capacity() > capacity);
        assert_eq!(buffer.size(), gap + 8);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "nested capacity reservation")]
    fn nested_reservation_panics()
    {
        let arena = Arena::new();
        let mut buffer = CodeBuffer::new(&arena);
        buffer.with_reserved_capacity(|buffer| {
            buffer.with_reserved_capacity(|_| { });
        });
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "atomic emission exceeded the guaranteed gap")]
    fn oversized_emission_panics()
    {
        let arena = Arena::new();
        let mut buffer = CodeBuffer::new(&arena);
        buffer.with_reserved_capacity(|buffer| {
            for _ in 0 .. MINIMUM_GAP + 1 {
                buffer.emit_u8(0x90);
            }
        });
    }
}
