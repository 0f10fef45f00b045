// Copyright 2024 Karpeles Lab Inc.
// Based on the S2 compression format by Klaus Post
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Reference decoder for block bodies, used to check encoder output.
#![allow(dead_code)]

/// One decoded element of a block body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Literal { length: usize },
    Copy { offset: usize, length: usize },
    Repeat { length: usize },
}

/// Error raised for malformed block bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corrupt(pub &'static str);

impl std::fmt::Display for Corrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s2: corrupt input: {}", self.0)
    }
}

impl std::error::Error for Corrupt {}

/// Parse the tag at the start of `src`. Returns the operation and the
/// number of bytes the tag occupies, literal bytes excluded.
pub fn read_op(src: &[u8]) -> Result<(Op, usize), Corrupt> {
    let need = |n: usize| {
        if src.len() < n {
            Err(Corrupt("truncated tag"))
        } else {
            Ok(())
        }
    };
    let b = |i: usize| src[i] as usize;

    need(1)?;
    match src[0] & 0x03 {
        0x00 => {
            let (length, size) = match src[0] >> 2 {
                x @ 0..=59 => (x as usize, 1),
                60 => {
                    need(2)?;
                    (b(1), 2)
                }
                61 => {
                    need(3)?;
                    (b(1) | b(2) << 8, 3)
                }
                62 => {
                    need(4)?;
                    (b(1) | b(2) << 8 | b(3) << 16, 4)
                }
                _ => {
                    need(5)?;
                    (b(1) | b(2) << 8 | b(3) << 16 | b(4) << 24, 5)
                }
            };
            Ok((Op::Literal { length: length + 1 }, size))
        }
        0x01 => {
            need(2)?;
            let offset = ((b(0) & 0xe0) << 3) | b(1);
            let code = (b(0) >> 2) & 0x7;
            if offset != 0 {
                return Ok((
                    Op::Copy {
                        offset,
                        length: code + 4,
                    },
                    2,
                ));
            }
            let (length, size) = match code {
                5 => {
                    need(3)?;
                    (b(2) + 4, 3)
                }
                6 => {
                    need(4)?;
                    ((b(2) | b(3) << 8) + (1 << 8), 4)
                }
                7 => {
                    need(5)?;
                    ((b(2) | b(3) << 8 | b(4) << 16) + (1 << 16), 5)
                }
                _ => (code, 2),
            };
            Ok((Op::Repeat { length: length + 4 }, size))
        }
        0x02 => {
            need(3)?;
            Ok((
                Op::Copy {
                    offset: b(1) | b(2) << 8,
                    length: (b(0) >> 2) + 1,
                },
                3,
            ))
        }
        _ => {
            need(5)?;
            Ok((
                Op::Copy {
                    offset: b(1) | b(2) << 8 | b(3) << 16 | b(4) << 24,
                    length: (b(0) >> 2) + 1,
                },
                5,
            ))
        }
    }
}

/// Split a block body into its operations
pub fn ops(src: &[u8]) -> Result<Vec<Op>, Corrupt> {
    let mut out = Vec::new();
    let mut s = 0;
    while s < src.len() {
        let (op, size) = read_op(&src[s..])?;
        s += size;
        if let Op::Literal { length } = op {
            if length > src.len() - s {
                return Err(Corrupt("literal past end of input"));
            }
            s += length;
        }
        out.push(op);
    }
    Ok(out)
}

/// Decode a block body that is known to expand to `dlen` bytes
pub fn decode_body(src: &[u8], dlen: usize) -> Result<Vec<u8>, Corrupt> {
    let mut dst = Vec::with_capacity(dlen);
    let mut offset = 0;
    let mut s = 0;

    while s < src.len() {
        let (op, size) = read_op(&src[s..])?;
        s += size;

        let length = match op {
            Op::Literal { length } => {
                if length > src.len() - s || length > dlen - dst.len() {
                    return Err(Corrupt("literal out of range"));
                }
                dst.extend_from_slice(&src[s..s + length]);
                s += length;
                continue;
            }
            Op::Copy { offset: o, length } => {
                offset = o;
                length
            }
            Op::Repeat { length } => length,
        };

        if offset == 0 || offset > dst.len() || length > dlen - dst.len() {
            return Err(Corrupt("copy out of range"));
        }

        // Overlapping copies repeat the pattern, so copy byte by byte.
        let start = dst.len() - offset;
        for i in 0..length {
            let b = dst[start + i];
            dst.push(b);
        }
    }

    if dst.len() != dlen {
        return Err(Corrupt("decoded length mismatch"));
    }
    Ok(dst)
}

/// Prefix a block body with the uvarint of its decoded length, giving the
/// block format read by S2 and Snappy decoders
pub fn with_len_prefix(body: &[u8], dlen: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 10);
    let mut v = dlen as u64;
    while v >= 0x80 {
        out.push(v as u8 | 0x80);
        v >>= 7;
    }
    out.push(v as u8);
    out.extend_from_slice(body);
    out
}

/// Test inputs with different amounts of redundancy
pub fn patterns(size: usize) -> Vec<(&'static str, Vec<u8>)> {
    let text = b"The quick brown fox jumps over the lazy dog. ";
    vec![
        ("zeros", vec![0u8; size]),
        ("run", vec![b'a'; size]),
        ("sequential", (0..size).map(|i| (i % 256) as u8).collect()),
        ("modular", (0..size).map(|i| ((i * 7919) % 256) as u8).collect()),
        ("text", text.iter().cycle().take(size).copied().collect()),
        (
            "lines",
            (0..)
                .flat_map(|i| format!("{:08} entry {} value={}\n", i, i % 13, i * 31).into_bytes())
                .take(size)
                .collect(),
        ),
        (
            "sparse",
            (0..size)
                .map(|i| if i % 97 == 0 { (i / 97) as u8 } else { 0 })
                .collect(),
        ),
    ]
}
