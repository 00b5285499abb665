//! # Logical and Physical Memory Address Types
//!
//! Strongly typed wrappers for the two address spaces an early-boot loader
//! juggles: the **logical** handles the loading code reads and writes through,
//! and the **physical** addresses the firmware and memory map talk about.
//!
//! ## Overview
//!
//! | Type | Description |
//! |----------|-------------|
//! | [`MemoryAddress`] | A raw 64-bit address, either logical or physical. |
//! | [`LogicalAddress`] | An address as seen by the loading code. |
//! | [`PhysicalAddress`] | A hardware memory address. |
//!
//! [`LogicalAddress`] and [`PhysicalAddress`] never convert into each other
//! directly. Going from one to the other requires a translation capability
//! owned by the caller, which keeps "I have a pointer" and "I have a frame"
//! apart at the type level.
//!
//! ## Page Sizes
//!
//! Firmware page allocators hand out memory in 4 KiB units, modeled by the
//! [`Size4K`] marker implementing [`PageSize`]. Use [`PageSize::pages_for`] to
//! round a byte length up to whole pages.
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! assert_eq!(Size4K::pages_for(0), 0);
//! assert_eq!(Size4K::pages_for(1), 1);
//! assert_eq!(Size4K::pages_for(0x2000), 2);
//! assert_eq!(Size4K::pages_for(0x2001), 3);
//!
//! let la = LogicalAddress::new(0x10_0000);
//! assert_eq!(la.checked_add(0x1000), Some(LogicalAddress::new(0x10_1000)));
//! assert_eq!(LogicalAddress::new(u64::MAX).checked_add(1), None);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

mod logical_address;
mod memory_address;
mod page_size;
mod physical_address;

pub use logical_address::LogicalAddress;
pub use memory_address::MemoryAddress;
pub use page_size::{PageSize, Size4K};
pub use physical_address::PhysicalAddress;
