#![no_main]

use hxs_format::{Config, File};
use libfuzzer_sys::fuzz_target;

const CFG: Config = Config {
    max_depth: 64,
    max_len: 1 << 16,
};

fuzz_target!(|data: &[u8]| {
    let Ok(file) = File::decode_cfg(data, &CFG) else {
        return;
    };
    // Lenient decodes (mismatched schema block sizes, non-canonical booleans) may not
    // reproduce the input, but whatever is encoded must be stable.
    let Ok(encoded) = file.encode() else {
        return;
    };
    let decoded = File::decode_cfg(&encoded[..], &CFG).expect("encoded file must decode");
    assert_eq!(decoded.encode().expect("decoded file must encode"), encoded);
});
