#![no_main]

use libfuzzer_sys::fuzz_target;

use parbench_core::constants::{EXECUTION_TIME_LABEL, RESULT_LABEL};
use parbench_core::parser::{extract_field, parse_output};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let parsed = parse_output(&text);

    // The combined parse must agree with the single-label form
    assert_eq!(
        parsed.execution_time.map(f64::to_bits),
        extract_field(&text, EXECUTION_TIME_LABEL).map(f64::to_bits)
    );
    assert_eq!(
        parsed.result.map(f64::to_bits),
        extract_field(&text, RESULT_LABEL).map(f64::to_bits)
    );

    if !text.contains(EXECUTION_TIME_LABEL) {
        assert!(parsed.execution_time.is_none());
    }
});
