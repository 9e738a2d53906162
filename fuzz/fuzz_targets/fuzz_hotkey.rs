#![no_main]

use iconlaunch::hotkey::HotkeyBinding;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The hotkey grammar must reject garbage without panicking, and every
    // accepted string must round-trip through its canonical display form
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(binding) = HotkeyBinding::parse(s) {
            let reparsed = HotkeyBinding::parse(&binding.to_string()).unwrap();
            assert_eq!(binding, reparsed);
        }
    }
});
