use core::slice;

/// Callback that returns an externally owned buffer to its allocator.
///
/// Called with the opaque peer token and the data pointer that were
/// registered alongside the buffer.
pub type ReleaseCallback = unsafe fn(peer: *mut (), data: *mut u8);

/// Bytes owned by an external allocator.
///
/// The value records the pointer and never copies the bytes; this is
/// how large buffers (for example file contents) move between
/// execution contexts without a copy. The registered callback must be
/// invoked exactly once when the bytes are no longer referenced.
///
/// The callback is held as a one-shot capability: it is consumed
/// either by [`release`][`ExternalBytes::release`] or when the value
/// is dropped, whichever comes first, so releasing twice has no way to
/// be expressed.
pub struct ExternalBytes
{
    length: usize,
    data: *mut u8,
    peer: *mut (),
    release: Option<ReleaseCallback>,
}

// Crossing the isolation boundary hands the bytes over wholesale:
// the sender stops touching them once the value is sent, and exactly
// one context references them at any time.
unsafe impl Send for ExternalBytes { }

// A shared reference exposes no mutation, and reading the bytes is
// already gated behind the exclusivity contract of `as_slice`.
// Values must be shareable so the process-wide singletons can live
// in statics.
unsafe impl Sync for ExternalBytes { }

impl ExternalBytes
{
    /// Wrap externally owned bytes.
    ///
    /// # Safety
    ///
    /// `data` must point to `length` readable bytes, and the pointer
    /// must stay valid until `release` is invoked with `peer` and
    /// `data`. No other context may mutate the bytes while this value
    /// exists.
    pub unsafe fn new(
        length: usize,
        data: *mut u8,
        peer: *mut (),
        release: ReleaseCallback,
    ) -> Self
    {
        Self{length, data, peer, release: Some(release)}
    }

    /// Number of bytes.
    pub fn len(&self) -> usize
    {
        self.length
    }

    /// Whether there are no bytes.
    pub fn is_empty(&self) -> bool
    {
        self.length == 0
    }

    /// The external data pointer.
    pub fn data(&self) -> *mut u8
    {
        self.data
    }

    /// The opaque peer token registered with the buffer.
    pub fn peer(&self) -> *mut ()
    {
        self.peer
    }

    /// View the bytes.
    ///
    /// # Safety
    ///
    /// The caller must uphold the exclusivity contract of
    /// [`new`][`Self::new`]: no other context is mutating the bytes.
    pub unsafe fn as_slice(&self) -> &[u8]
    {
        slice::from_raw_parts(self.data, self.length)
    }

    /// Return the bytes to their allocator now instead of at drop time.
    pub fn release(mut self)
    {
        self.release_now();
    }

    fn release_now(&mut self)
    {
        if let Some(release) = self.release.take() {
            // SAFETY: `new` promised the pointer stays valid until the
            // callback runs, and `take` guarantees it runs only once.
            unsafe { release(self.peer, self.data) };
        }
    }
}

impl Drop for ExternalBytes
{
    fn drop(&mut self)
    {
        self.release_now();
    }
}

impl PartialEq for ExternalBytes
{
    /// Two values are equal when they wrap the same external buffer.
    fn eq(&self, other: &Self) -> bool
    {
        self.data == other.data && self.length == other.length
    }
}

impl core::fmt::Debug for ExternalBytes
{
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result
    {
        f.debug_struct("ExternalBytes")
            .field("length", &self.length)
            .field("data", &self.data)
            .field("peer", &self.peer)
            .finish()
    }
}
