mod common;

use common::{
    CountingTranslator, FakeMemory, PATTERN, RecordingSink, ScriptedFirmware, descriptor,
};
use kernel_memory_addresses::{LogicalAddress, PhysicalAddress};
use uefi_segment::{
    CONVENTIONAL_MEMORY, FirmwareAllocator, FirmwareError, MAX_MEMORY_MAP_ENTRIES,
    OffsetTranslator, SegmentError, SegmentPreparer, SegmentStatus,
};

/// `EFI_NOT_FOUND` with the error bit set.
const NOT_FOUND: FirmwareError = FirmwareError(0x8000_0000_0000_000e);

type Preparer = SegmentPreparer<
    CountingTranslator,
    FirmwareAllocator<ScriptedFirmware>,
    FakeMemory,
    RecordingSink,
>;

fn preparer(firmware: ScriptedFirmware) -> Preparer {
    SegmentPreparer::new(
        CountingTranslator::default(),
        FirmwareAllocator::new(firmware),
        FakeMemory::new(0x10_0000, 0x3000),
        RecordingSink::default(),
    )
}

#[test]
fn requests_exact_address_and_ceiling_page_count() {
    let mut p = preparer(ScriptedFirmware::default());

    assert_eq!(p.prepare(LogicalAddress::new(0x10_0000), 0x1000, 0x2000), Ok(()));
    assert_eq!(p.prepare(LogicalAddress::new(0x10_0000), 0x10, 0x2001), Ok(()));
    assert_eq!(p.prepare(LogicalAddress::new(0x10_0000), 0, 1), Ok(()));

    assert_eq!(
        p.backend().firmware().requests,
        [
            (PhysicalAddress::new(0x10_0000), 2),
            (PhysicalAddress::new(0x10_0000), 3),
            (PhysicalAddress::new(0x10_0000), 1),
        ]
    );
}

#[test]
fn granted_allocation_zeroes_only_the_tail() {
    let mut p = preparer(ScriptedFirmware::default());

    let status = p.prepare_segment(LogicalAddress::new(0x10_0000), 0x1000, 0x2000);
    assert_eq!(status, SegmentStatus::Ok);

    let mem = p.zero_fill();
    assert!(mem.range(0x10_0000, 0x10_1000).iter().all(|&b| b == PATTERN));
    assert!(mem.range(0x10_1000, 0x10_2000).iter().all(|&b| b == 0));
    assert!(mem.range(0x10_2000, 0x10_3000).iter().all(|&b| b == PATTERN));
    assert_eq!(p.backend().firmware().map_calls, 0);
}

#[test]
fn denied_allocation_dumps_the_memory_map() {
    let mut p = preparer(ScriptedFirmware {
        deny: Some(NOT_FOUND),
        map: vec![
            descriptor(2, 0x0, 0x100),
            descriptor(CONVENTIONAL_MEMORY, 0x20_0000, 0x10),
        ],
        ..ScriptedFirmware::default()
    });

    let status = p.prepare_segment(LogicalAddress::new(0x10_0000), 0x1000, 0x2000);
    assert_eq!(status, SegmentStatus::RangeUnavailable);
    assert_eq!(status.message(), "Requested memory not available");

    assert!(p.zero_fill().calls.is_empty());
    assert_eq!(p.backend().firmware().map_calls, 1);

    let sink = p.sink();
    assert!(sink.contains(
        "Segment [100000,101000,102000) does not fit into available memory: firmware status 0x800000000000000e"
    ));
    assert!(sink.contains("[0] type 2 attr f phys 0 virt 0 size 100000"));
    assert!(sink.contains("[1] type 7 attr f phys 200000 virt 0 size 10000"));
}

#[test]
fn dump_is_truncated_to_snapshot_capacity() {
    let map = (0..(MAX_MEMORY_MAP_ENTRIES as u64 + 20))
        .map(|i| descriptor(CONVENTIONAL_MEMORY, i * 0x1000, 1))
        .collect();
    let mut p = preparer(ScriptedFirmware {
        deny: Some(NOT_FOUND),
        map,
        ..ScriptedFirmware::default()
    });

    assert_eq!(
        p.prepare(LogicalAddress::new(0x10_0000), 0, 0x1000),
        Err(SegmentError::RangeUnavailable)
    );

    let dumped = p
        .sink()
        .lines
        .iter()
        .filter(|l| l.starts_with('['))
        .count();
    assert_eq!(dumped, MAX_MEMORY_MAP_ENTRIES);
}

#[test]
fn unreadable_memory_map_is_reported() {
    let mut p = preparer(ScriptedFirmware {
        deny: Some(NOT_FOUND),
        map_error: Some(FirmwareError(0x8000_0000_0000_0005)),
        ..ScriptedFirmware::default()
    });

    assert_eq!(
        p.prepare(LogicalAddress::new(0x10_0000), 0, 0x1000),
        Err(SegmentError::RangeUnavailable)
    );
    assert!(p.sink().contains("GetMemoryMap failed with firmware status 0x8000000000000005"));
}

#[test]
fn invalid_geometry_never_reaches_the_firmware() {
    let mut p = preparer(ScriptedFirmware::default());

    let status = p.prepare_segment(LogicalAddress::new(0x10_0000), 0x3000, 0x2000);
    assert_eq!(status, SegmentStatus::InvalidRange);
    assert!(p.backend().firmware().requests.is_empty());
    assert_eq!(p.backend().firmware().map_calls, 0);
    assert_eq!(p.translator().calls.get(), 0);
    assert!(p.zero_fill().calls.is_empty());
}

#[test]
fn translated_address_is_requested_from_the_firmware() {
    const HHDM: u64 = 0xffff_8880_0000_0000;
    let mut p = SegmentPreparer::new(
        OffsetTranslator::new(HHDM),
        FirmwareAllocator::new(ScriptedFirmware::default()),
        FakeMemory::new(HHDM + 0x10_0000, 0x2000),
        RecordingSink::default(),
    );

    assert_eq!(p.prepare(LogicalAddress::new(HHDM + 0x10_0000), 0x1000, 0x2000), Ok(()));
    assert_eq!(
        p.backend().firmware().requests,
        [(PhysicalAddress::new(0x10_0000), 2)]
    );
    assert!(p.zero_fill().range(HHDM + 0x10_1000, HHDM + 0x10_2000).iter().all(|&b| b == 0));
}

#[test]
#[should_panic(expected = "firmware allocated")]
fn relocated_allocation_halts() {
    let mut p = preparer(ScriptedFirmware {
        relocate_to: Some(PhysicalAddress::new(0x30_0000)),
        ..ScriptedFirmware::default()
    });

    let _ = p.prepare(LogicalAddress::new(0x10_0000), 0x1000, 0x2000);
}
