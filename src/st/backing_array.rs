use crate::core::{StoreError, WeightedCell};
use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};
use std::{mem, slice};

// every element type below is at most 8-aligned
const ALIGN: usize = 8;

/// Plain-old-data element types a `BackingArray` may be viewed as.
///
/// Implementors must be valid for every bit pattern, have no padding, and
/// need at most `ALIGN` alignment.
pub unsafe trait Element: Copy + 'static {}

unsafe impl Element for u8 {}
unsafe impl Element for u16 {}
unsafe impl Element for u32 {}
unsafe impl Element for u64 {}
unsafe impl Element for WeightedCell {}

/// Zero-initialized, exclusively owned block of bytes.
///
/// The block carries no element type; views are taken per access. An empty
/// array owns no allocation.
pub struct BackingArray {
    ptr: NonNull<u8>,
    byte_len: usize,
}

// the block is never shared; access follows the usual borrow rules
unsafe impl Send for BackingArray {}
unsafe impl Sync for BackingArray {}

#[inline]
fn get_layout(byte_len: usize) -> Result<Layout, StoreError> {
    Layout::from_size_align(byte_len, ALIGN).map_err(|_| StoreError::AllocationFailure {
        requested_bytes: Some(byte_len),
    })
}

impl BackingArray {
    pub fn empty() -> BackingArray {
        BackingArray {
            ptr: NonNull::<u64>::dangling().cast(),
            byte_len: 0,
        }
    }

    // produce zeroed array of byte_len bytes
    pub fn zeroed(byte_len: usize) -> Result<BackingArray, StoreError> {
        if byte_len == 0 {
            return Ok(BackingArray::empty());
        }
        let layout = get_layout(byte_len)?;
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(BackingArray { ptr, byte_len }),
            None => {
                tracing::debug!(bytes = byte_len, "Counter storage allocation failed.");
                Err(StoreError::AllocationFailure {
                    requested_bytes: Some(byte_len),
                })
            }
        }
    }

    pub fn try_clone(&self) -> Result<BackingArray, StoreError> {
        let mut copy = BackingArray::zeroed(self.byte_len)?;
        copy.as_bytes_mut().copy_from_slice(self.as_bytes());
        Ok(copy)
    }

    #[inline(always)]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.byte_len) }
    }

    #[inline(always)]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.byte_len) }
    }

    /// Views the block as elements of `T`. Trailing bytes that do not fill a
    /// whole element are not part of the view.
    #[inline(always)]
    pub fn as_slice<T: Element>(&self) -> &[T] {
        debug_assert!(mem::align_of::<T>() <= ALIGN);
        let len = self.byte_len / mem::size_of::<T>();
        unsafe { slice::from_raw_parts(self.ptr.as_ptr() as *const T, len) }
    }

    #[inline(always)]
    pub fn as_slice_mut<T: Element>(&mut self) -> &mut [T] {
        debug_assert!(mem::align_of::<T>() <= ALIGN);
        let len = self.byte_len / mem::size_of::<T>();
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr() as *mut T, len) }
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        unsafe {
            ptr::write_bytes(self.ptr.as_ptr(), 0, self.byte_len);
        }
    }
}

impl Drop for BackingArray {
    fn drop(&mut self) {
        if self.byte_len == 0 {
            return;
        }
        // the layout was valid when the block was allocated
        if let Ok(layout) = get_layout(self.byte_len) {
            unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) };
        }
    }
}
