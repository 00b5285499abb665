//! # Segment geometry

use crate::error::SegmentError;
use crate::translate::AddressTranslator;
use core::fmt;
use kernel_memory_addresses::{LogicalAddress, PhysicalAddress};

/// Check that the file-backed prefix fits inside the in-memory footprint.
///
/// Has no side effects; it runs before anything translates, reserves, or
/// writes memory.
///
/// # Errors
/// [`SegmentError::InvalidRange`] if `filesz > memsz`.
pub const fn validate(filesz: u64, memsz: u64) -> Result<(), SegmentError> {
    if filesz > memsz {
        return Err(SegmentError::InvalidRange { filesz, memsz });
    }
    Ok(())
}

/// A validated image segment: `filesz` bytes of file content at `start`,
/// followed by `memsz - filesz` bytes that must read as zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Segment {
    start: LogicalAddress,
    filesz: u64,
    memsz: u64,
}

impl Segment {
    /// # Errors
    /// [`SegmentError::InvalidRange`] if `filesz > memsz`.
    pub const fn new(start: LogicalAddress, filesz: u64, memsz: u64) -> Result<Self, SegmentError> {
        match validate(filesz, memsz) {
            Ok(()) => Ok(Self {
                start,
                filesz,
                memsz,
            }),
            Err(e) => Err(e),
        }
    }

    #[must_use]
    pub const fn start(&self) -> LogicalAddress {
        self.start
    }

    #[must_use]
    pub const fn filesz(&self) -> u64 {
        self.filesz
    }

    #[must_use]
    pub const fn memsz(&self) -> u64 {
        self.memsz
    }

    /// Length of the zero-initialized tail.
    #[must_use]
    pub const fn tail_len(&self) -> u64 {
        self.memsz - self.filesz
    }

    /// Translate the segment's start, file end, and memory end.
    ///
    /// # Errors
    /// [`SegmentError::RangeUnavailable`] if the segment runs past the end of
    /// the address space, in either logical or physical terms.
    pub fn physical_span<T>(&self, translator: &T) -> Result<PhysicalSpan, SegmentError>
    where
        T: AddressTranslator + ?Sized,
    {
        let mid = self
            .start
            .checked_add(self.filesz)
            .ok_or(SegmentError::RangeUnavailable)?;
        let end = self
            .start
            .checked_add(self.memsz)
            .ok_or(SegmentError::RangeUnavailable)?;

        let span = PhysicalSpan {
            start: translator.to_physical(self.start),
            mid: translator.to_physical(mid),
            end: translator.to_physical(end),
        };

        if span.end.as_u64().checked_sub(span.start.as_u64()) != Some(self.memsz) {
            return Err(SegmentError::RangeUnavailable);
        }

        Ok(span)
    }
}

/// Physical view of a segment: `[start, mid)` is file-backed, `[mid, end)` is zeroed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PhysicalSpan {
    pub start: PhysicalAddress,
    pub mid: PhysicalAddress,
    pub end: PhysicalAddress,
}

impl fmt::Display for PhysicalSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:x},{:x},{:x})", self.start, self.mid, self.end)
    }
}
