//! # Segment preparation
//!
//! ```text
//! Start ──validate──▶ Validated ──reserve──▶ Reserved ──zero tail──▶ Done
//!   │                     │
//!   └── InvalidRange      └── RangeUnavailable
//! ```
//!
//! Every call walks this sequence once. Nothing is retried, and a failure in
//! one stage skips everything after it.

use crate::backend::{ReservationBackend, ReservationRequest};
use crate::diagnostics::DiagnosticSink;
use crate::error::{SegmentError, SegmentStatus};
use crate::segment::Segment;
use crate::translate::AddressTranslator;
use crate::zero_fill::ZeroFill;
use kernel_memory_addresses::LogicalAddress;

/// Validates, reserves, and zero-fills image segments.
///
/// Calls must be serialized by the caller; two preparations of overlapping
/// ranges are not safe to interleave.
#[derive(Debug)]
pub struct SegmentPreparer<T, B, Z, D> {
    translator: T,
    backend: B,
    zero_fill: Z,
    sink: D,
}

impl<T, B, Z, D> SegmentPreparer<T, B, Z, D>
where
    T: AddressTranslator,
    B: ReservationBackend,
    Z: ZeroFill,
    D: DiagnosticSink,
{
    #[must_use]
    pub const fn new(translator: T, backend: B, zero_fill: Z, sink: D) -> Self {
        Self {
            translator,
            backend,
            zero_fill,
            sink,
        }
    }

    /// Prepare the segment at `start` to receive `filesz` bytes of file
    /// content within a `memsz`-byte footprint.
    ///
    /// On success, `[start, start + memsz)` is reserved and
    /// `[start + filesz, start + memsz)` reads as zero. The file-backed prefix
    /// is left untouched for the caller to fill.
    ///
    /// # Errors
    /// - [`SegmentError::InvalidRange`] if `filesz > memsz`. Nothing else is
    ///   consulted.
    /// - [`SegmentError::RangeUnavailable`] if the backend cannot vouch for the
    ///   range, or the range runs off the end of the address space.
    ///
    /// # Panics
    /// If the firmware hands back memory at a different address than the
    /// one requested.
    pub fn prepare(
        &mut self,
        start: LogicalAddress,
        filesz: u64,
        memsz: u64,
    ) -> Result<(), SegmentError> {
        let segment = match Segment::new(start, filesz, memsz) {
            Ok(segment) => segment,
            Err(e) => {
                self.sink.emit(format_args!(
                    "Insane segment at {start:x}: filesz {filesz:#x} > memsz {memsz:#x}"
                ));
                return Err(e);
            }
        };

        let span = match segment.physical_span(&self.translator) {
            Ok(span) => span,
            Err(e) => {
                self.sink.emit(format_args!(
                    "Segment at {start:x} with memsz {memsz:#x} leaves the address space"
                ));
                return Err(e);
            }
        };

        let tail_len: usize = addressable_tail(&segment, &mut self.sink)?;

        self.sink.emit(format_args!("Preparing segment {span}"));

        let request = ReservationRequest {
            segment,
            span,
            translator: &self.translator,
        };
        self.backend.reserve(&request, &mut self.sink)?;

        if tail_len != 0 {
            self.zero_fill.zero(segment.start(), segment.filesz(), tail_len);
        }

        Ok(())
    }

    /// [`prepare`](Self::prepare), reported as a status code.
    ///
    /// # Panics
    /// See [`prepare`](Self::prepare).
    #[must_use]
    pub fn prepare_segment(
        &mut self,
        start: LogicalAddress,
        filesz: u64,
        memsz: u64,
    ) -> SegmentStatus {
        self.prepare(start, filesz, memsz).into()
    }

    #[must_use]
    pub const fn translator(&self) -> &T {
        &self.translator
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn zero_fill(&self) -> &Z {
        &self.zero_fill
    }

    #[must_use]
    pub const fn sink(&self) -> &D {
        &self.sink
    }

    #[must_use]
    pub fn into_parts(self) -> (T, B, Z, D) {
        (self.translator, self.backend, self.zero_fill, self.sink)
    }
}

/// The segment's tail length as an `N`, or `RangeUnavailable` if it does not fit.
fn addressable_tail<N: TryFrom<u64>>(
    segment: &Segment,
    sink: &mut dyn DiagnosticSink,
) -> Result<N, SegmentError> {
    let tail_len = segment.tail_len();
    N::try_from(tail_len).map_err(|_| {
        sink.emit(format_args!(
            "Segment at {:x} has a tail of {tail_len:#x} bytes, too long to address",
            segment.start()
        ));
        SegmentError::RangeUnavailable
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt;

    #[derive(Default)]
    struct Lines(Vec<String>);

    impl DiagnosticSink for Lines {
        fn emit(&mut self, args: fmt::Arguments<'_>) {
            self.0.push(args.to_string());
        }
    }

    #[test]
    fn oversized_tail_is_reported() {
        let segment = Segment::new(LogicalAddress::new(0x10_0000), 0, 1 << 32).unwrap();
        let mut sink = Lines::default();

        let result: Result<u32, _> = addressable_tail(&segment, &mut sink);
        assert_eq!(result, Err(SegmentError::RangeUnavailable));
        assert_eq!(
            sink.0,
            ["Segment at 100000 has a tail of 0x100000000 bytes, too long to address"]
        );
    }

    #[test]
    fn addressable_tail_is_silent() {
        let segment = Segment::new(LogicalAddress::new(0x10_0000), 0x1000, 0x3000).unwrap();
        let mut sink = Lines::default();

        let result: Result<u32, _> = addressable_tail(&segment, &mut sink);
        assert_eq!(result, Ok(0x2000));
        assert!(sink.0.is_empty());
    }
}
