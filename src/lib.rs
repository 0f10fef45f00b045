// Copyright 2024 Karpeles Lab Inc.
// Based on the S2 compression format by Klaus Post
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! # S2 Block Encoder
//!
//! This library implements the fast single-pass block encoder of the S2
//! compression format, an extension of Snappy. Output follows the generated
//! single-pass block encoders of github.com/klauspost/compress/s2 (the
//! `encodeBlockAsm*` family) with the same table configuration. Other
//! encoders in that package, such as the pure Go fallback, split long copies
//! differently and produce different, equally valid bytes.
//!
//! The encoder provides:
//! - A greedy hash-table match finder with a repeat-offset fast path
//! - Four table sizes trading search speed for ratio
//! - A classic mode whose output any Snappy decoder can read
//! - The literal, copy and repeat tag encoders as standalone primitives
//!
//! Only the block body is produced. The varint length prefix, stream framing
//! and decompression are left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use s2block::{encode_block, max_encoded_len, BlockConfig};
//!
//! let data = b"Hello, World! Hello, World! Hello, World! Hello, World!";
//! let mut dst = vec![0u8; max_encoded_len(data.len()).unwrap()];
//!
//! let n = encode_block(&mut dst, data, &BlockConfig::for_input_len(data.len(), false));
//! assert!(n > 0 && n < data.len());
//! ```

mod config;
mod constants;
mod emit;
mod encode;
mod error;
mod hash;
mod matchlen;

pub use config::BlockConfig;
pub use constants::{INPUT_MARGIN, MAX_BLOCK_SIZE, MIN_NON_LITERAL_BLOCK_SIZE};
pub use emit::{emit_copy, emit_copy_no_repeat, emit_literal, emit_repeat};
pub use encode::{encode_block, encode_or_store, max_encoded_len, BlockEncoder};
pub use error::{Error, Result};
pub use hash::Hasher;
pub use matchlen::match_len;
