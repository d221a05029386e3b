#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use flowgate::binary::BinaryEventCodec;

fuzz_target!(|data: &[u8]| {
    let mut codec = BinaryEventCodec::new();
    if codec.read_from(&mut Cursor::new(data), None).is_err() {
        assert!(codec.file_log().has_errors());
    }

    // Header-only loads must not depend on the event data
    let _ = codec.read_from(&mut Cursor::new(data), Some(0));
});
