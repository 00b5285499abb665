//! # Zeroing the uninitialized tail

use kernel_memory_addresses::LogicalAddress;

/// Clears memory addressed through logical handles.
pub trait ZeroFill {
    /// Zero `len` bytes starting `offset` bytes past `start`.
    fn zero(&mut self, start: LogicalAddress, offset: u64, len: usize);
}

impl<Z: ZeroFill + ?Sized> ZeroFill for &mut Z {
    fn zero(&mut self, start: LogicalAddress, offset: u64, len: usize) {
        (**self).zero(start, offset, len);
    }
}

/// Writes zeros straight through the logical handle.
#[derive(Debug)]
pub struct RawZeroFill {
    _private: (),
}

impl RawZeroFill {
    /// # Safety
    /// Every logical handle passed to [`ZeroFill::zero`] must be directly
    /// dereferenceable in the current address space, and the range being
    /// zeroed must be owned by the caller (it is, once reserved).
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl ZeroFill for RawZeroFill {
    fn zero(&mut self, start: LogicalAddress, offset: u64, len: usize) {
        let dst = (start + offset).as_mut_ptr::<u8>();
        // SAFETY: guaranteed by the contract of `RawZeroFill::new`.
        unsafe {
            core::ptr::write_bytes(dst, 0, len);
        }
    }
}
