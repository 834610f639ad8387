#![no_main]

use libfuzzer_sys::fuzz_target;
use sesswap_adapters::cdp::{decode_reply, parse_evaluate_reply};

fuzz_target!(|data: &str| {
    // Frames off the page socket are untrusted; decoding and interpreting
    // them may fail but must never panic.
    if let Ok(reply) = decode_reply(data) {
        let _ = parse_evaluate_reply(&reply);
    }
});
