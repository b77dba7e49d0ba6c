//! SIMD-aligned allocation for backing buffers.
//!
//! Every byte buffer in this crate sits on memory aligned to the widest
//! vector instruction set enabled at build time, so scanning code can load
//! full vector registers from the start of a buffer without a scalar
//! prologue. The alignment is a single build-time constant; it is not a
//! per-call parameter.
//!
//! [`AlignedAlloc`] is pure memory-management infrastructure with no
//! awareness of JSON: any container of any element type can use it.
//! [`AlignedBytes`] is the owned byte buffer built on top of it that backs
//! [`RawJson`](crate::RawJson).

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::{Error, Result};

/// Buffer alignment in bytes, selected from the vector ISA tier enabled at
/// build time (512-bit, 256-bit, 128-bit or scalar).
#[cfg(target_feature = "avx512f")]
pub const ALIGNMENT: usize = 64;

#[cfg(all(target_feature = "avx2", not(target_feature = "avx512f")))]
pub const ALIGNMENT: usize = 32;

#[cfg(all(
    any(target_feature = "sse2", target_feature = "neon"),
    not(target_feature = "avx2"),
    not(target_feature = "avx512f")
))]
pub const ALIGNMENT: usize = 16;

#[cfg(not(any(
    target_feature = "sse2",
    target_feature = "neon",
    target_feature = "avx2",
    target_feature = "avx512f"
)))]
pub const ALIGNMENT: usize = 8;

/// Stateless allocator handing out blocks aligned to [`ALIGNMENT`].
///
/// Elements whose natural alignment exceeds [`ALIGNMENT`] keep their natural
/// alignment instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignedAlloc<T> {
    _marker: PhantomData<T>,
}

impl<T> AlignedAlloc<T> {
    /// Create an allocator handle. Free to copy around; it carries no state.
    #[inline]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    #[inline]
    fn layout_for(n: usize) -> Result<Layout> {
        let align = ALIGNMENT.max(std::mem::align_of::<T>());
        let size = std::mem::size_of::<T>()
            .checked_mul(n)
            .ok_or(Error::AllocationFailure { size: usize::MAX, align })?;
        Layout::from_size_align(size, align)
            .map_err(|_| Error::AllocationFailure { size, align })
    }

    /// Allocate uninitialized storage for `n` elements.
    ///
    /// Requesting zero elements (or a zero-sized element type) returns the
    /// dangling handle without touching the heap. A failed request reports
    /// [`Error::AllocationFailure`]; this never returns a misaligned or
    /// truncated block.
    #[inline]
    pub fn allocate(&self, n: usize) -> Result<NonNull<T>> {
        let layout = Self::layout_for(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: layout has non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr.cast::<T>()).ok_or(Error::AllocationFailure {
            size: layout.size(),
            align: layout.align(),
        })
    }

    /// Release a block previously returned by [`allocate`](Self::allocate)
    /// with the same `n`. Deallocating the zero-element handle is a no-op.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate(n)` on this allocator type and must not
    /// have been deallocated already. Anything else is undefined behavior,
    /// exactly as with the global allocator.
    #[inline]
    pub unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let Ok(layout) = Self::layout_for(n) else {
            return;
        };
        if layout.size() == 0 {
            return;
        }
        alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout);
    }

    /// Move `value` into the uninitialized slot at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must point into storage from [`allocate`](Self::allocate) and
    /// the slot must not already hold a live value.
    #[inline]
    pub unsafe fn construct(&self, ptr: NonNull<T>, value: T) {
        ptr.as_ptr().write(value);
    }

    /// Drop the value at `ptr` in place, leaving the slot uninitialized.
    ///
    /// # Safety
    ///
    /// `ptr` must point at a live value previously installed with
    /// [`construct`](Self::construct).
    #[inline]
    pub unsafe fn destroy(&self, ptr: NonNull<T>) {
        ptr.as_ptr().drop_in_place();
    }
}

/// Owned, immutable byte buffer on SIMD-aligned storage.
///
/// This is the storage behind every lazy value's text. Cloning copies the
/// bytes into a fresh aligned block; nothing aliases.
pub struct AlignedBytes {
    ptr: NonNull<u8>,
    len: usize,
}

// The buffer is exclusively owned and never mutated after construction.
unsafe impl Send for AlignedBytes {}
unsafe impl Sync for AlignedBytes {}

impl AlignedBytes {
    /// The empty buffer. Does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
        }
    }

    /// Copy `bytes` into a fresh aligned buffer.
    ///
    /// Allocation failure aborts via [`alloc::handle_alloc_error`]; use
    /// [`try_from_slice`](Self::try_from_slice) to recover instead.
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Self {
        match Self::try_from_slice(bytes) {
            Ok(buf) => buf,
            Err(_) => {
                let layout = Layout::from_size_align(bytes.len(), ALIGNMENT)
                    .unwrap_or(Layout::new::<u8>());
                alloc::handle_alloc_error(layout)
            }
        }
    }

    /// Copy `bytes` into a fresh aligned buffer, reporting allocation
    /// failure instead of aborting.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let alloc = AlignedAlloc::<u8>::new();
        let ptr = alloc.allocate(bytes.len())?;
        if !bytes.is_empty() {
            // SAFETY: `ptr` has room for `bytes.len()` bytes and the source
            // slice cannot overlap a freshly allocated block.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
            }
        }
        Ok(Self {
            ptr,
            len: bytes.len(),
        })
    }

    /// View the stored bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `len` bytes for the lifetime of `self`
        // (dangling but aligned when `len == 0`, which `from_raw_parts`
        // permits).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Stored length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for AlignedBytes {
    fn drop(&mut self) {
        // SAFETY: `ptr`/`len` came from a matching `allocate`.
        unsafe {
            AlignedAlloc::<u8>::new().deallocate(self.ptr, self.len);
        }
    }
}

impl Clone for AlignedBytes {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }
}

impl Default for AlignedBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for AlignedBytes {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq for AlignedBytes {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for AlignedBytes {}

impl std::fmt::Debug for AlignedBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBytes")
            .field("len", &self.len)
            .field("bytes", &String::from_utf8_lossy(self.as_slice()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_is_aligned() {
        let alloc = AlignedAlloc::<u8>::new();
        for n in [1usize, 7, 64, 1000] {
            let ptr = alloc.allocate(n).unwrap();
            assert_eq!(ptr.as_ptr() as usize % ALIGNMENT, 0);
            unsafe { alloc.deallocate(ptr, n) };
        }
    }

    #[test]
    fn test_allocate_zero_is_empty_handle() {
        let alloc = AlignedAlloc::<u64>::new();
        let ptr = alloc.allocate(0).unwrap();
        assert_eq!(ptr, NonNull::dangling());
        // No-op, must not crash.
        unsafe { alloc.deallocate(ptr, 0) };
    }

    #[test]
    fn test_construct_destroy() {
        let alloc = AlignedAlloc::<String>::new();
        let ptr = alloc.allocate(1).unwrap();
        unsafe {
            alloc.construct(ptr, String::from("hello"));
            assert_eq!(ptr.as_ref(), "hello");
            alloc.destroy(ptr);
            alloc.deallocate(ptr, 1);
        }
    }

    #[test]
    fn test_allocate_overflow_fails() {
        let alloc = AlignedAlloc::<u64>::new();
        assert!(matches!(
            alloc.allocate(usize::MAX),
            Err(crate::Error::AllocationFailure { .. })
        ));
    }

    #[test]
    fn test_aligned_bytes_round_trip() {
        let buf = AlignedBytes::from_slice(b"{\"a\":1}");
        assert_eq!(buf.as_slice(), b"{\"a\":1}");
        assert_eq!(buf.as_ptr() as usize % ALIGNMENT, 0);

        let copy = buf.clone();
        assert_eq!(copy, buf);
        drop(buf);
        assert_eq!(copy.as_slice(), b"{\"a\":1}");
    }

    #[test]
    fn test_aligned_bytes_empty() {
        let buf = AlignedBytes::new();
        assert!(buf.is_empty());
        assert_eq!(buf.as_slice(), b"");
        assert_eq!(buf, AlignedBytes::from_slice(b""));
    }
}
