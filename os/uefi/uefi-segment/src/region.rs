//! # Available memory regions
//!
//! Without a firmware allocator, the loader only knows which physical spans
//! were free when someone last looked. A [`RegionProvider`] walks those spans
//! afresh on every request, in whatever order it reports them. Regions are
//! never merged or sorted: two adjacent regions stay two regions.

use crate::memory_map::FirmwareMemoryDescriptor;
use core::fmt;
use core::ops::ControlFlow;
use kernel_memory_addresses::PhysicalAddress;

/// A physical span `[start, end)` believed available.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: PhysicalAddress,
    pub end: PhysicalAddress,
}

impl MemoryRegion {
    #[must_use]
    pub const fn new(start: PhysicalAddress, end: PhysicalAddress) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn from_u64(start: u64, end: u64) -> Self {
        Self::new(PhysicalAddress::new(start), PhysicalAddress::new(end))
    }

    /// Whether `[start, end)` lies entirely inside this region.
    #[must_use]
    pub const fn contains(&self, start: PhysicalAddress, end: PhysicalAddress) -> bool {
        self.start.as_u64() <= start.as_u64() && end.as_u64() <= self.end.as_u64()
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:x},{:x})", self.start, self.end)
    }
}

/// Source of the currently available regions.
pub trait RegionProvider {
    /// Hand every currently available region to `visit`, in order, until it
    /// breaks. Each call reflects the state at the time of the call.
    fn for_each_region(&mut self, visit: &mut dyn FnMut(&MemoryRegion) -> ControlFlow<()>);
}

impl<P: RegionProvider + ?Sized> RegionProvider for &mut P {
    fn for_each_region(&mut self, visit: &mut dyn FnMut(&MemoryRegion) -> ControlFlow<()>) {
        (**self).for_each_region(visit);
    }
}

/// First region, in provider order, that fully contains `[start, end)`.
pub fn find_containing<P>(
    provider: &mut P,
    start: PhysicalAddress,
    end: PhysicalAddress,
) -> Option<MemoryRegion>
where
    P: RegionProvider + ?Sized,
{
    let mut found = None;
    provider.for_each_region(&mut |region| {
        if region.contains(start, end) {
            found = Some(*region);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    found
}

/// Regions from a fixed list, e.g. one assembled by the platform code at boot.
#[derive(Debug, Copy, Clone)]
pub struct StaticRegions<'a> {
    regions: &'a [MemoryRegion],
}

impl<'a> StaticRegions<'a> {
    #[must_use]
    pub const fn new(regions: &'a [MemoryRegion]) -> Self {
        Self { regions }
    }
}

impl RegionProvider for StaticRegions<'_> {
    fn for_each_region(&mut self, visit: &mut dyn FnMut(&MemoryRegion) -> ControlFlow<()>) {
        for region in self.regions {
            if visit(region).is_break() {
                return;
            }
        }
    }
}

/// Conventional-memory entries of a firmware memory map, in map order.
#[derive(Debug, Copy, Clone)]
pub struct MemoryMapRegions<'a> {
    descriptors: &'a [FirmwareMemoryDescriptor],
}

impl<'a> MemoryMapRegions<'a> {
    #[must_use]
    pub const fn new(descriptors: &'a [FirmwareMemoryDescriptor]) -> Self {
        Self { descriptors }
    }
}

impl RegionProvider for MemoryMapRegions<'_> {
    fn for_each_region(&mut self, visit: &mut dyn FnMut(&MemoryRegion) -> ControlFlow<()>) {
        let usable = self
            .descriptors
            .iter()
            .filter(|d| d.is_conventional() && d.page_count != 0);

        for d in usable {
            if visit(&MemoryRegion::new(d.phys_start, d.phys_end())).is_break() {
                return;
            }
        }
    }
}
