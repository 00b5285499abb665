//! # Reservation backends
//!
//! A backend proves (or claims) that a segment's physical range is safe to
//! write before anything is zeroed:
//!
//! - [`FirmwareAllocator`] claims the exact range from the firmware's page
//!   allocator. Success means the pages now belong to the caller.
//! - [`RegionScanner`] checks the range against the currently available
//!   regions. Success is advisory: nothing is recorded anywhere.

mod firmware;
mod region_scanner;

pub use firmware::{FirmwareAllocator, FirmwareServices};
pub use region_scanner::RegionScanner;

use crate::diagnostics::DiagnosticSink;
use crate::error::SegmentError;
use crate::segment::{PhysicalSpan, Segment};
use crate::translate::AddressTranslator;

/// Everything a backend needs to know about the segment it is reserving.
pub struct ReservationRequest<'a> {
    pub segment: Segment,
    pub span: PhysicalSpan,
    pub translator: &'a dyn AddressTranslator,
}

pub trait ReservationBackend {
    /// Reserve `[span.start, span.end)` for the segment.
    ///
    /// # Errors
    /// [`SegmentError::RangeUnavailable`] if the range cannot be proven or
    /// claimed. A failed call leaves no allocation behind.
    fn reserve(
        &mut self,
        request: &ReservationRequest<'_>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), SegmentError>;
}

impl<B: ReservationBackend + ?Sized> ReservationBackend for &mut B {
    fn reserve(
        &mut self,
        request: &ReservationRequest<'_>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), SegmentError> {
        (**self).reserve(request, sink)
    }
}
