//! # Status codes and error messages

/// Why a segment could not be prepared.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    #[error("Invalid segment geometry: file size {filesz:#x} exceeds memory size {memsz:#x}")]
    InvalidRange { filesz: u64, memsz: u64 },
    #[error("Requested memory not available")]
    RangeUnavailable,
}

impl SegmentError {
    #[must_use]
    pub const fn status(&self) -> SegmentStatus {
        match self {
            Self::InvalidRange { .. } => SegmentStatus::InvalidRange,
            Self::RangeUnavailable => SegmentStatus::RangeUnavailable,
        }
    }
}

/// Closed set of results reported by segment preparation.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SegmentStatus {
    /// Segment reserved and zero-filled.
    Ok = 0,
    /// `filesz > memsz`; nothing was touched.
    InvalidRange = 1,
    /// The requested range could not be proven or claimed safe.
    RangeUnavailable = 2,
}

impl SegmentStatus {
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The operator-facing message for this status.
    #[must_use]
    pub fn message(self) -> &'static str {
        describe(self)
    }
}

impl From<SegmentError> for SegmentStatus {
    fn from(value: SegmentError) -> Self {
        value.status()
    }
}

impl From<Result<(), SegmentError>> for SegmentStatus {
    fn from(value: Result<(), SegmentError>) -> Self {
        match value {
            Ok(()) => Self::Ok,
            Err(e) => e.status(),
        }
    }
}

/// An entry of the error message table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub status: SegmentStatus,
    pub message: &'static str,
}

/// Human-readable messages for every failure status.
pub static SEGMENT_ERRORS: [ErrorEntry; 2] = [
    ErrorEntry {
        status: SegmentStatus::InvalidRange,
        message: "Invalid segment geometry",
    },
    ErrorEntry {
        status: SegmentStatus::RangeUnavailable,
        message: "Requested memory not available",
    },
];

/// Look up the message registered for `status`.
#[must_use]
pub fn describe(status: SegmentStatus) -> &'static str {
    if status.is_ok() {
        return "No error";
    }

    SEGMENT_ERRORS
        .iter()
        .find(|entry| entry.status == status)
        .map_or("Unknown error", |entry| entry.message)
}

/// A firmware call failed; carries the raw firmware status value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("firmware status {0:#x}")]
pub struct FirmwareError(pub u64);

#[cfg(feature = "uefi")]
impl From<SegmentError> for uefi::Status {
    fn from(value: SegmentError) -> Self {
        match value {
            SegmentError::InvalidRange { .. } => Self::INVALID_PARAMETER,
            SegmentError::RangeUnavailable => Self::OUT_OF_RESOURCES,
        }
    }
}

#[cfg(feature = "uefi")]
impl From<uefi::Error> for FirmwareError {
    fn from(value: uefi::Error) -> Self {
        Self(value.status().0 as u64)
    }
}
