#![no_main]

use libfuzzer_sys::fuzz_target;

use parbench_core::measurement::TimingTable;
use parbench_core::speedup::compute_speedups;

fuzz_target!(|data: &[u8]| {
    // Each 10-byte chunk: size (1 byte), threads (1 byte), seconds (8 bytes)
    let mut times = TimingTable::new();
    for chunk in data.chunks_exact(10) {
        let size = usize::from(chunk[0] % 4) * 100 + 100;
        let threads = usize::from(chunk[1] % 8) + 1;
        let mut bits = [0u8; 8];
        bits.copy_from_slice(&chunk[2..]);
        times.insert_time(size, threads, f64::from_le_bytes(bits));
    }

    let report = compute_speedups(&times);
    for size in report.speedups.sizes() {
        assert_eq!(report.speedups.get(size, 1), Some(1.0));
        for (_, speedup) in report.speedups.row(size) {
            assert!(speedup >= 0.0, "speedup {speedup} for size {size}");
        }
    }
});
