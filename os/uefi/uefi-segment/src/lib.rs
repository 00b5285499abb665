//! # Executable Segment Preparation for Early Boot
//!
//! Before a loader copies an image segment into place, the target memory has
//! to be proven safe and the segment's uninitialized tail has to be cleared.
//! This crate does exactly that, and nothing else: it never parses image
//! formats, copies file contents, or frees memory later.
//!
//! ## Overview
//!
//! ```text
//! prepare(start, filesz, memsz)
//!         ↓
//! ┌──────────────────────────────────────────────┐
//! │ 1. Validate      filesz <= memsz             │
//! │ 2. Reserve       FirmwareAllocator           │
//! │                  or RegionScanner            │
//! │ 3. Zero-fill     [start+filesz, start+memsz) │
//! └──────────────────────────────────────────────┘
//!         ↓
//! SegmentStatus::{Ok, InvalidRange, RangeUnavailable}
//! ```
//!
//! ## Backends
//!
//! * **[`FirmwareAllocator`]**: asks the firmware for the segment's exact
//!   physical pages. If the firmware refuses, the current memory map is dumped
//!   to the diagnostic sink before the error is returned.
//! * **[`RegionScanner`]**: walks the currently available regions on every
//!   call and accepts the first region that contains the whole segment.
//!   Adjacent regions are never merged.
//!
//! Which backend runs is decided by whoever builds the [`SegmentPreparer`].
//! With the `uefi` feature, [`UefiSegmentPreparer`] wires up the firmware
//! backend on top of UEFI Boot Services.
//!
//! ## Collaborators
//!
//! | Trait | Role |
//! |-------|------|
//! | [`AddressTranslator`] | Logical handle ↔ physical address. |
//! | [`ReservationBackend`] | Proves or claims the physical range. |
//! | [`ZeroFill`] | Clears the uninitialized tail. |
//! | [`DiagnosticSink`] | Receives trace lines and memory map dumps. |
//!
//! ## Example
//!
//! ```rust
//! use kernel_memory_addresses::LogicalAddress;
//! use uefi_segment::*;
//!
//! struct Ram<'a> { base: u64, bytes: &'a mut [u8] }
//!
//! impl ZeroFill for Ram<'_> {
//!     fn zero(&mut self, start: LogicalAddress, offset: u64, len: usize) {
//!         let at = usize::try_from(start.as_u64() + offset - self.base).unwrap();
//!         self.bytes[at..at + len].fill(0);
//!     }
//! }
//!
//! let available = [MemoryRegion::from_u64(0x10_0000, 0x20_0000)];
//! let mut bytes = vec![0xAA; 0x2000];
//!
//! let mut preparer = SegmentPreparer::new(
//!     IdentityTranslator,
//!     RegionScanner::new(StaticRegions::new(&available)),
//!     Ram { base: 0x10_0000, bytes: &mut bytes },
//!     NullSink,
//! );
//!
//! let status = preparer.prepare_segment(LogicalAddress::new(0x10_0000), 0x1000, 0x2000);
//! assert_eq!(status, SegmentStatus::Ok);
//! drop(preparer);
//! assert!(bytes[..0x1000].iter().all(|&b| b == 0xAA));
//! assert!(bytes[0x1000..].iter().all(|&b| b == 0));
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod backend;
mod diagnostics;
mod error;
mod memory_map;
mod preparer;
mod region;
mod segment;
mod translate;
#[cfg(feature = "uefi")]
mod uefi_services;
mod zero_fill;

pub use backend::{
    FirmwareAllocator, FirmwareServices, RegionScanner, ReservationBackend, ReservationRequest,
};
pub use diagnostics::{DiagnosticSink, LogSink, NullSink};
pub use error::{ErrorEntry, FirmwareError, SEGMENT_ERRORS, SegmentError, SegmentStatus, describe};
pub use memory_map::{
    CONVENTIONAL_MEMORY, FirmwareMemoryDescriptor, MAX_MEMORY_MAP_ENTRIES, MemoryMapSnapshot,
};
pub use preparer::SegmentPreparer;
pub use region::{
    MemoryMapRegions, MemoryRegion, RegionProvider, StaticRegions, find_containing,
};
pub use segment::{PhysicalSpan, Segment, validate};
pub use translate::{AddressTranslator, IdentityTranslator, OffsetTranslator};
#[cfg(feature = "uefi")]
pub use uefi_services::{UefiBootServices, UefiSegmentPreparer};
pub use zero_fill::{RawZeroFill, ZeroFill};
