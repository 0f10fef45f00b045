#![no_main]

#[path = "../../tests/common/mod.rs"]
mod common;

use libfuzzer_sys::fuzz_target;
use s2block::{encode_block, encode_or_store, max_encoded_len, BlockConfig};

const PRESETS: [BlockConfig; 8] = [
    BlockConfig::S2_14B,
    BlockConfig::S2_12B,
    BlockConfig::S2_10B,
    BlockConfig::S2_8B,
    BlockConfig::SNAPPY_14B,
    BlockConfig::SNAPPY_12B,
    BlockConfig::SNAPPY_10B,
    BlockConfig::SNAPPY_8B,
];

fuzz_target!(|data: &[u8]| {
    // Skip very large inputs to avoid OOM
    if data.len() > 1_000_000 || data.is_empty() {
        return;
    }

    // The first byte picks the preset and the size of dst
    let config = PRESETS[(data[0] & 7) as usize];
    let src = &data[1..];

    if src.len() >= 8 {
        let room = src.len() >> ((data[0] >> 3) & 3);
        let mut dst = vec![0u8; room];
        let n = encode_block(&mut dst, src, &config);
        if n > 0 {
            let decoded = common::decode_body(&dst[..n], src.len()).expect("decode failed");
            assert_eq!(src, &decoded[..], "roundtrip failed for {:?}", config);

            if config.classic_format() {
                let ops = common::ops(&dst[..n]).expect("parse failed");
                assert!(ops.iter().all(|op| !matches!(op, common::Op::Repeat { .. })));
            }
        }
    }

    let mut dst = vec![0u8; max_encoded_len(src.len()).unwrap()];
    let n = encode_or_store(&mut dst, src, config.classic_format());
    let decoded = common::decode_body(&dst[..n], src.len()).expect("decode failed");
    assert_eq!(src, &decoded[..], "stored roundtrip failed");
});
