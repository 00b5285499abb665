//! # Firmware memory map snapshots
//!
//! When the firmware refuses an exact-address allocation, the current memory
//! map is captured into a fixed-capacity buffer and dumped for postmortem
//! analysis. The buffer holds at most [`MAX_MEMORY_MAP_ENTRIES`] descriptors;
//! anything beyond that is dropped without notice.

use crate::diagnostics::DiagnosticSink;
use kernel_memory_addresses::{PageSize, PhysicalAddress, Size4K};

/// Capacity of a [`MemoryMapSnapshot`].
pub const MAX_MEMORY_MAP_ENTRIES: usize = 100;

/// UEFI `EfiConventionalMemory`: free memory usable by the loader.
pub const CONVENTIONAL_MEMORY: u32 = 7;

/// One firmware memory map entry, decoupled from the firmware's ABI layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FirmwareMemoryDescriptor {
    /// Firmware memory type (`EFI_MEMORY_TYPE`).
    pub ty: u32,
    /// Attribute bits (`EFI_MEMORY_*`).
    pub attribute: u64,
    pub phys_start: PhysicalAddress,
    pub virt_start: u64,
    /// Size in 4 KiB pages.
    pub page_count: u64,
}

impl FirmwareMemoryDescriptor {
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.page_count.saturating_mul(Size4K::SIZE)
    }

    /// Exclusive end of the described range, saturated at the top of the address space.
    #[must_use]
    pub const fn phys_end(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.phys_start.as_u64().saturating_add(self.size_bytes()))
    }

    #[must_use]
    pub const fn is_conventional(&self) -> bool {
        self.ty == CONVENTIONAL_MEMORY
    }
}

/// Bounded copy of the firmware memory map.
#[derive(Debug, Default, Clone)]
pub struct MemoryMapSnapshot {
    entries: heapless::Vec<FirmwareMemoryDescriptor, MAX_MEMORY_MAP_ENTRIES>,
}

impl MemoryMapSnapshot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: heapless::Vec::new(),
        }
    }

    /// Append a descriptor; silently ignored once the snapshot is full.
    pub fn push(&mut self, desc: FirmwareMemoryDescriptor) {
        let _ = self.entries.push(desc);
    }

    #[must_use]
    pub fn entries(&self) -> &[FirmwareMemoryDescriptor] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write one line per captured descriptor.
    pub fn dump(&self, sink: &mut dyn DiagnosticSink) {
        for (i, p) in self.entries.iter().enumerate() {
            sink.emit(format_args!(
                "[{i:x}] type {:x} attr {:x} phys {:x} virt {:x} size {:x}",
                p.ty,
                p.attribute,
                p.phys_start,
                p.virt_start,
                p.size_bytes()
            ));
        }
    }
}
