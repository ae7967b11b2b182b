#![no_main]

use enclave_envelope::{classify, Response};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(Response::Sealed(envelope)) = classify(data) {
        let _ = envelope.decode();
    }
});
