//! # Diagnostic output
//!
//! Segment preparation reports what it is doing (and, on firmware allocation
//! failure, the whole memory map) as free-form text lines. Where those lines
//! end up is up to the embedding loader; [`LogSink`] hands them to the `log`
//! facade so they follow whatever logger was installed at boot.

use core::fmt;

/// Receives unstructured diagnostic text, one line per call.
pub trait DiagnosticSink {
    fn emit(&mut self, args: fmt::Arguments<'_>);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn emit(&mut self, args: fmt::Arguments<'_>) {
        (**self).emit(args);
    }
}

/// Forwards diagnostics to [`log::debug!`].
#[derive(Debug, Default, Copy, Clone)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, args: fmt::Arguments<'_>) {
        log::debug!(target: "uefi_segment", "{args}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _args: fmt::Arguments<'_>) {}
}
