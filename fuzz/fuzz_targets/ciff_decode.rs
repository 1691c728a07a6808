#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(image) = caff::CiffImage::from_bytes(data) {
        assert_eq!(image.pixels.len() as u64, image.header.content_size);
    }
});
