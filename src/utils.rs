use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use tracing::trace;

use crate::error::{allocation_error, layout_error, Result};

/// Element types whose all-zero bit pattern is a valid value.
///
/// Sealed: only implemented inside this crate, for `f32`.
///
/// ```compile_fail
/// use matbench::utils::AlignedVec;
///
/// let _ = AlignedVec::<std::num::NonZeroU32>::new_zeroed(1, 4);
/// ```
///
/// ```compile_fail
/// #[derive(Clone, Copy)]
/// struct Flag(bool);
///
/// impl matbench::utils::Zeroable for Flag {}
/// ```
pub trait Zeroable: sealed::Sealed + Copy {}

mod sealed {
    pub trait Sealed {}

    impl Sealed for f32 {}
}

impl Zeroable for f32 {}

/// A fixed-length heap buffer with a caller-chosen alignment.
///
/// The memory is zero-initialized on allocation and released in `Drop`, so a
/// buffer is freed on every exit path of the scope that owns it, including
/// unwinding out of a failed assertion.
pub struct AlignedVec<T: Zeroable> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

impl<T: Zeroable> AlignedVec<T> {
    /// Allocates `len` zeroed elements aligned to `align` bytes.
    ///
    /// # Errors
    ///
    /// - [`LayoutError`](crate::error::MatbenchError::LayoutError) if `align`
    ///   is not a power of two, is below the natural alignment of `T`, or the
    ///   byte size overflows.
    /// - [`AllocationError`](crate::error::MatbenchError::AllocationError) if
    ///   the allocator returns null.
    pub fn new_zeroed(len: usize, align: usize) -> Result<Self> {
        if !align.is_power_of_two() || align < mem::align_of::<T>() {
            return Err(layout_error(
                len.saturating_mul(mem::size_of::<T>()),
                align,
                "alignment must be a power of two and at least the element alignment",
            ));
        }

        let size = len
            .checked_mul(mem::size_of::<T>())
            .ok_or_else(|| layout_error(usize::MAX, align, "buffer size overflows usize"))?;

        let layout = Layout::from_size_align(size, align)
            .map_err(|e| layout_error(size, align, e.to_string()))?;

        if size == 0 {
            // Nothing to allocate; an address equal to the alignment is non-null
            // and aligned, which is all a zero-length slice needs.
            let ptr = NonNull::new(align as *mut T).unwrap_or(NonNull::dangling());
            return Ok(AlignedVec { ptr, len, layout });
        }

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw as *mut T)
            .ok_or_else(|| allocation_error(size, align, "allocator returned null"))?;

        trace!(bytes = size, align, "allocated aligned buffer");

        Ok(AlignedVec { ptr, len, layout })
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` when the first element sits on an `align`-byte boundary.
    pub fn is_aligned_to(&self, align: usize) -> bool {
        (self.ptr.as_ptr() as usize) % align == 0
    }
}

impl<T: Zeroable> Drop for AlignedVec<T> {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: ptr was returned by alloc_zeroed with this exact layout.
            unsafe {
                dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
            }
        }
    }
}

impl<T: Zeroable> Deref for AlignedVec<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        // SAFETY: ptr is valid for len initialized (zeroed) elements.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Zeroable> DerefMut for AlignedVec<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: ptr is valid for len elements and uniquely owned by self.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Zeroable> std::fmt::Debug for AlignedVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedVec")
            .field("len", &self.len)
            .field("align", &self.layout.align())
            .finish()
    }
}
