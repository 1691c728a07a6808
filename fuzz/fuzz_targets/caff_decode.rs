#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(caff) = caff::CaffContainer::from_bytes(data) {
        assert_eq!(caff.frames.len() as u64, caff.header.num_animations);
    }
});
