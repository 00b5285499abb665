//! # Logical/physical address translation

use kernel_memory_addresses::{LogicalAddress, PhysicalAddress};

/// Converts between the loader's logical handles and physical addresses.
pub trait AddressTranslator {
    fn to_physical(&self, addr: LogicalAddress) -> PhysicalAddress;
    fn to_logical(&self, addr: PhysicalAddress) -> LogicalAddress;
}

impl<T: AddressTranslator + ?Sized> AddressTranslator for &T {
    fn to_physical(&self, addr: LogicalAddress) -> PhysicalAddress {
        (**self).to_physical(addr)
    }

    fn to_logical(&self, addr: PhysicalAddress) -> LogicalAddress {
        (**self).to_logical(addr)
    }
}

/// Logical handles are physical addresses (UEFI boot services run identity-mapped).
#[derive(Debug, Default, Copy, Clone)]
pub struct IdentityTranslator;

impl AddressTranslator for IdentityTranslator {
    #[inline]
    fn to_physical(&self, addr: LogicalAddress) -> PhysicalAddress {
        PhysicalAddress::new(addr.as_u64())
    }

    #[inline]
    fn to_logical(&self, addr: PhysicalAddress) -> LogicalAddress {
        LogicalAddress::new(addr.as_u64())
    }
}

/// Physical memory is visible at a fixed offset (`logical = physical + base`),
/// as with a higher-half direct map.
#[derive(Debug, Copy, Clone)]
pub struct OffsetTranslator {
    base: u64,
}

impl OffsetTranslator {
    #[must_use]
    pub const fn new(base: u64) -> Self {
        Self { base }
    }
}

impl AddressTranslator for OffsetTranslator {
    #[inline]
    fn to_physical(&self, addr: LogicalAddress) -> PhysicalAddress {
        PhysicalAddress::new(addr.as_u64().wrapping_sub(self.base))
    }

    #[inline]
    fn to_logical(&self, addr: PhysicalAddress) -> LogicalAddress {
        LogicalAddress::new(addr.as_u64().wrapping_add(self.base))
    }
}
