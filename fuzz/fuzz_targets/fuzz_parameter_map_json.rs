#![no_main]

use libfuzzer_sys::fuzz_target;

use flowgate::json::JsonParameterMapCodec;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut codec = JsonParameterMapCodec::new();
    if codec.load_from_text(&text).is_ok() {
        // Anything that loads must save and load again
        let saved = codec.save_to_text(0).expect("loaded map must save");
        let mut again = JsonParameterMapCodec::new();
        again.load_from_text(&saved).expect("saved map must load");
    }
});
