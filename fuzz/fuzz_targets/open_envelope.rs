#![no_main]

use enclave_envelope::{Envelope, EnvelopeCodec, SecretKey};
use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;

static ENCLAVE: Lazy<SecretKey> = Lazy::new(SecretKey::random);

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let a = (data[0] as usize) % (data.len() + 1);
    let b = (data[1] as usize) % (data.len() + 1);
    let (i, j) = if a <= b { (a, b) } else { (b, a) };

    let envelope = Envelope {
        ephemeral_public_key: hex::encode(&data[..i]),
        nonce: hex::encode(&data[i..j]),
        ciphertext: hex::encode(&data[j..]),
    };

    let codec: EnvelopeCodec = EnvelopeCodec::new();
    let _ = codec.open(&envelope, &ENCLAVE);
});
