#![no_main]

use libfuzzer_sys::fuzz_target;
use sexcfg::config::parser::parse;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for entry in parse(text).flatten() {
            assert!(!entry.key.is_empty());
            assert!(!entry.raw_value.is_empty());
            assert!(!entry.key.contains(char::is_whitespace));
        }
    }
});
