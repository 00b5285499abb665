use crate::backend::{ReservationBackend, ReservationRequest};
use crate::diagnostics::DiagnosticSink;
use crate::error::{FirmwareError, SegmentError};
use crate::memory_map::MemoryMapSnapshot;
use kernel_memory_addresses::{PageSize, PhysicalAddress, Size4K};

/// Page allocation and memory map access offered by boot firmware.
pub trait FirmwareServices {
    /// Allocate `pages` 4 KiB pages starting exactly at `address`.
    ///
    /// # Errors
    /// The firmware status if the range is already owned or out of range.
    fn allocate_pages_at(
        &mut self,
        address: PhysicalAddress,
        pages: usize,
    ) -> Result<PhysicalAddress, FirmwareError>;

    /// Copy the current memory map into `snapshot` (handed over empty).
    ///
    /// # Errors
    /// The firmware status if the map cannot be read.
    fn memory_map(&mut self, snapshot: &mut MemoryMapSnapshot) -> Result<(), FirmwareError>;
}

impl<F: FirmwareServices + ?Sized> FirmwareServices for &mut F {
    fn allocate_pages_at(
        &mut self,
        address: PhysicalAddress,
        pages: usize,
    ) -> Result<PhysicalAddress, FirmwareError> {
        (**self).allocate_pages_at(address, pages)
    }

    fn memory_map(&mut self, snapshot: &mut MemoryMapSnapshot) -> Result<(), FirmwareError> {
        (**self).memory_map(snapshot)
    }
}

/// Reserves segments by allocating their exact pages from the firmware.
#[derive(Debug)]
pub struct FirmwareAllocator<F> {
    firmware: F,
}

impl<F: FirmwareServices> FirmwareAllocator<F> {
    #[must_use]
    pub const fn new(firmware: F) -> Self {
        Self { firmware }
    }

    #[must_use]
    pub const fn firmware(&self) -> &F {
        &self.firmware
    }

    #[must_use]
    pub fn into_inner(self) -> F {
        self.firmware
    }

    fn dump_map(&mut self, sink: &mut dyn DiagnosticSink) {
        let mut snapshot = MemoryMapSnapshot::new();
        if let Err(e) = self.firmware.memory_map(&mut snapshot) {
            sink.emit(format_args!("GetMemoryMap failed with {e}"));
            return;
        }
        snapshot.dump(sink);
    }
}

impl<F: FirmwareServices> ReservationBackend for FirmwareAllocator<F> {
    fn reserve(
        &mut self,
        request: &ReservationRequest<'_>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), SegmentError> {
        let span = request.span;
        let pages = usize::try_from(Size4K::pages_for(request.segment.memsz()))
            .map_err(|_| SegmentError::RangeUnavailable)?;

        let phys = match self.firmware.allocate_pages_at(span.start, pages) {
            Ok(phys) => phys,
            Err(e) => {
                sink.emit(format_args!(
                    "Segment {span} does not fit into available memory: {e}"
                ));
                self.dump_map(sink);
                return Err(SegmentError::RangeUnavailable);
            }
        };

        // The firmware owns the pages now; a different placement means our
        // view of memory is wrong and nothing after this point is safe.
        assert_eq!(
            request.translator.to_logical(phys),
            request.segment.start(),
            "firmware allocated {phys} instead of {}",
            span.start
        );

        Ok(())
    }
}
