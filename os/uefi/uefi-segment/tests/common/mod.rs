//! Fake collaborators shared by the integration tests.
#![allow(dead_code)]

use core::cell::Cell;
use core::fmt;
use core::ops::ControlFlow;
use kernel_memory_addresses::{LogicalAddress, PhysicalAddress};
use uefi_segment::{
    AddressTranslator, DiagnosticSink, FirmwareError, FirmwareMemoryDescriptor, FirmwareServices,
    MemoryMapSnapshot, MemoryRegion, RegionProvider, ZeroFill,
};

/// Identity translation that counts how often it was asked.
#[derive(Default)]
pub struct CountingTranslator {
    pub calls: Cell<usize>,
}

impl AddressTranslator for CountingTranslator {
    fn to_physical(&self, addr: LogicalAddress) -> PhysicalAddress {
        self.calls.set(self.calls.get() + 1);
        PhysicalAddress::new(addr.as_u64())
    }

    fn to_logical(&self, addr: PhysicalAddress) -> LogicalAddress {
        self.calls.set(self.calls.get() + 1);
        LogicalAddress::new(addr.as_u64())
    }
}

/// A window of fake RAM at logical `base`, pre-filled with a pattern.
pub struct FakeMemory {
    pub base: u64,
    pub bytes: Vec<u8>,
    pub calls: Vec<(LogicalAddress, u64, usize)>,
}

pub const PATTERN: u8 = 0xAA;

impl FakeMemory {
    pub fn new(base: u64, len: usize) -> Self {
        Self {
            base,
            bytes: vec![PATTERN; len],
            calls: Vec::new(),
        }
    }

    /// Bytes of the logical range `[from, to)`.
    pub fn range(&self, from: u64, to: u64) -> &[u8] {
        let from = usize::try_from(from - self.base).unwrap();
        let to = usize::try_from(to - self.base).unwrap();
        &self.bytes[from..to]
    }
}

impl ZeroFill for FakeMemory {
    fn zero(&mut self, start: LogicalAddress, offset: u64, len: usize) {
        self.calls.push((start, offset, len));
        let at = usize::try_from(start.as_u64() + offset - self.base).unwrap();
        self.bytes[at..at + len].fill(0);
    }
}

/// Collects every diagnostic line.
#[derive(Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl RecordingSink {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&mut self, args: fmt::Arguments<'_>) {
        self.lines.push(args.to_string());
    }
}

/// A region provider whose list can be edited between calls.
#[derive(Default)]
pub struct ScriptedRegions {
    pub regions: Vec<MemoryRegion>,
    pub calls: usize,
}

impl ScriptedRegions {
    pub fn new(regions: &[MemoryRegion]) -> Self {
        Self {
            regions: regions.to_vec(),
            calls: 0,
        }
    }
}

impl RegionProvider for ScriptedRegions {
    fn for_each_region(&mut self, visit: &mut dyn FnMut(&MemoryRegion) -> ControlFlow<()>) {
        self.calls += 1;
        for region in &self.regions {
            if visit(region).is_break() {
                return;
            }
        }
    }
}

/// Firmware that grants or denies allocations as scripted.
#[derive(Default)]
pub struct ScriptedFirmware {
    /// Deny every allocation with this status.
    pub deny: Option<FirmwareError>,
    /// Fail `GetMemoryMap` with this status.
    pub map_error: Option<FirmwareError>,
    /// Hand back this address instead of the requested one.
    pub relocate_to: Option<PhysicalAddress>,
    pub map: Vec<FirmwareMemoryDescriptor>,
    pub requests: Vec<(PhysicalAddress, usize)>,
    pub map_calls: usize,
}

impl FirmwareServices for ScriptedFirmware {
    fn allocate_pages_at(
        &mut self,
        address: PhysicalAddress,
        pages: usize,
    ) -> Result<PhysicalAddress, FirmwareError> {
        self.requests.push((address, pages));
        if let Some(e) = self.deny {
            return Err(e);
        }
        Ok(self.relocate_to.unwrap_or(address))
    }

    fn memory_map(&mut self, snapshot: &mut MemoryMapSnapshot) -> Result<(), FirmwareError> {
        self.map_calls += 1;
        if let Some(e) = self.map_error {
            return Err(e);
        }
        for desc in &self.map {
            snapshot.push(*desc);
        }
        Ok(())
    }
}

pub fn descriptor(ty: u32, start: u64, pages: u64) -> FirmwareMemoryDescriptor {
    FirmwareMemoryDescriptor {
        ty,
        attribute: 0xf,
        phys_start: PhysicalAddress::new(start),
        virt_start: 0,
        page_count: pages,
    }
}
