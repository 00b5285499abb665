//! # UEFI Boot Services backing
//!
//! Only valid while Boot Services are active (before `ExitBootServices`).

use crate::backend::{FirmwareAllocator, FirmwareServices};
use crate::diagnostics::LogSink;
use crate::error::FirmwareError;
use crate::memory_map::{FirmwareMemoryDescriptor, MemoryMapSnapshot};
use crate::preparer::SegmentPreparer;
use crate::translate::IdentityTranslator;
use crate::zero_fill::RawZeroFill;
use kernel_memory_addresses::PhysicalAddress;
use uefi::boot::{self, AllocateType, MemoryType};
use uefi::mem::memory_map::MemoryMap;

/// [`FirmwareServices`] on top of UEFI `AllocatePages` / `GetMemoryMap`.
#[derive(Debug, Default, Copy, Clone)]
pub struct UefiBootServices;

impl FirmwareServices for UefiBootServices {
    fn allocate_pages_at(
        &mut self,
        address: PhysicalAddress,
        pages: usize,
    ) -> Result<PhysicalAddress, FirmwareError> {
        let ptr = boot::allocate_pages(
            AllocateType::Address(address.as_u64()),
            MemoryType::LOADER_DATA,
            pages,
        )?;
        Ok(PhysicalAddress::from_nonnull(ptr))
    }

    fn memory_map(&mut self, snapshot: &mut MemoryMapSnapshot) -> Result<(), FirmwareError> {
        let map = boot::memory_map(MemoryType::LOADER_DATA)?;
        for desc in map.entries() {
            snapshot.push(FirmwareMemoryDescriptor {
                ty: desc.ty.0,
                attribute: desc.att.bits(),
                phys_start: PhysicalAddress::new(desc.phys_start),
                virt_start: desc.virt_start,
                page_count: desc.page_count,
            });
        }
        Ok(())
    }
}

/// The preparer a UEFI loader uses: exact-address firmware allocation,
/// identity-mapped handles, diagnostics through `log`.
pub type UefiSegmentPreparer =
    SegmentPreparer<IdentityTranslator, FirmwareAllocator<UefiBootServices>, RawZeroFill, LogSink>;

impl UefiSegmentPreparer {
    /// # Safety
    /// Boot Services must be active and identity-mapped, so that logical
    /// handles are physical addresses the loader can write through.
    #[must_use]
    pub const unsafe fn uefi() -> Self {
        Self::new(
            IdentityTranslator,
            FirmwareAllocator::new(UefiBootServices),
            unsafe { RawZeroFill::new() },
            LogSink,
        )
    }
}
