use crate::MemoryAddress;
use core::fmt;
use core::ops::Add;

/// Logical memory address.
///
/// The handle the loading code uses to refer to memory. It does not validate
/// anything at runtime; it only carries the *kind* of address at the type
/// level so a logical handle is never passed where a
/// [`PhysicalAddress`](super::PhysicalAddress) is expected.
///
/// ### Invariants
/// - No invariant beyond "this is intended to be a logical address".
/// - Whether it can be dereferenced depends on the current mapping, see
///   [`as_mut_ptr`](Self::as_mut_ptr).
///
/// ### Examples
/// ```rust
/// # use kernel_memory_addresses::*;
/// let la = LogicalAddress::new(0x0010_0000);
/// assert_eq!(la + 0x1000, LogicalAddress::new(0x0010_1000));
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LogicalAddress(MemoryAddress);

impl LogicalAddress {
    #[inline]
    #[must_use]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(MemoryAddress::from_ptr(ptr))
    }

    #[inline]
    #[must_use]
    pub const fn new(v: u64) -> Self {
        Self(MemoryAddress::new(v))
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0.as_u64()
    }

    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: u64) -> Option<Self> {
        match self.0.checked_add(rhs) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// The handle as a raw pointer. Only meaningful where logical handles
    /// are directly addressable (e.g. identity-mapped boot environments).
    #[inline]
    #[must_use]
    pub fn as_mut_ptr<T>(self) -> *mut T {
        self.0.as_mut_ptr()
    }
}

impl fmt::Debug for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LA(0x{:016X})", self.as_u64())
    }
}

impl fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.as_u64())
    }
}

impl fmt::LowerHex for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<u64> for LogicalAddress {
    #[inline]
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

impl Add<u64> for LogicalAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0 + rhs)
    }
}
