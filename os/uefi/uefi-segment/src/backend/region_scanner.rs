use crate::backend::{ReservationBackend, ReservationRequest};
use crate::diagnostics::DiagnosticSink;
use crate::error::SegmentError;
use crate::region::{RegionProvider, find_containing};

/// Checks segments against the available regions, first fit.
///
/// The provider is walked afresh on every call, so regions carved out or
/// handed back between two preparations are always taken into account.
/// Nothing guards against changes *during* a call.
#[derive(Debug)]
pub struct RegionScanner<P> {
    provider: P,
}

impl<P: RegionProvider> RegionScanner<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    pub const fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    #[must_use]
    pub fn into_inner(self) -> P {
        self.provider
    }
}

impl<P: RegionProvider> ReservationBackend for RegionScanner<P> {
    fn reserve(
        &mut self,
        request: &ReservationRequest<'_>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), SegmentError> {
        let span = request.span;

        if let Some(region) = find_containing(&mut self.provider, span.start, span.end) {
            sink.emit(format_args!("Segment {span} fits into region {region}"));
            return Ok(());
        }

        sink.emit(format_args!(
            "Segment {span} does not fit into available memory"
        ));
        Err(SegmentError::RangeUnavailable)
    }
}
