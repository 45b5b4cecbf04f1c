//! Standard-alphabet base64 with `=` padding (RFC 4648 section 4). No line wrapping.
//!
//! Encoded text is length-delimited: nothing here writes or counts a terminator.

use crate::error::CodecError;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD: u8 = b'=';

/// Decode table value for `=`.
const PAD_INDEX: u8 = 64;
/// Decode table value for bytes outside the 65 recognised symbols.
const INVALID: u8 = 0xFF;

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table[PAD as usize] = PAD_INDEX;
    table
}

/// Byte -> 6-bit index, `PAD_INDEX` for `=`, `INVALID` otherwise. Evaluated at compile time.
static DECODE_TABLE: [u8; 256] = build_decode_table();

// ---- Encode ----

/// Encoded length for `n` input bytes: `ceil(n / 3) * 4`. `None` on overflow.
pub const fn encoded_len(n: usize) -> Option<usize> {
    n.div_ceil(3).checked_mul(4)
}

/// Encode one group of 1..=3 bytes. Missing bytes contribute zero bits and are emitted as `=`.
fn encode_group(chunk: &[u8]) -> [u8; 4] {
    let b0 = chunk[0];
    let b1 = chunk.get(1).copied().unwrap_or(0);
    let b2 = chunk.get(2).copied().unwrap_or(0);

    let c0 = ALPHABET[(b0 >> 2) as usize];
    let c1 = ALPHABET[(((b0 & 0x03) << 4) | (b1 >> 4)) as usize];
    let c2 = if chunk.len() > 1 {
        ALPHABET[(((b1 & 0x0F) << 2) | (b2 >> 6)) as usize]
    } else {
        PAD
    };
    let c3 = if chunk.len() > 2 {
        ALPHABET[(b2 & 0x3F) as usize]
    } else {
        PAD
    };
    [c0, c1, c2, c3]
}

/// Append the encoding of `input` to `out`.
pub fn encode_to(input: &[u8], out: &mut String) {
    for chunk in input.chunks(3) {
        out.extend(encode_group(chunk).map(char::from));
    }
}

/// Encode `input` into a new string.
pub fn encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(encoded_len(input.len()).unwrap_or(0));
    encode_to(input, &mut out);
    out
}

/// Encode `input` into `out`, returning the number of characters written (no terminator).
///
/// Fails with [`CodecError::BufferTooSmall`] before writing anything when `out` is shorter than
/// [`encoded_len`]. Bytes of `out` past the returned count are left untouched.
pub fn encode_into(input: &[u8], out: &mut [u8]) -> Result<usize, CodecError> {
    let needed = encoded_len(input.len()).ok_or(CodecError::BufferTooSmall {
        needed: usize::MAX,
        available: out.len(),
    })?;
    if out.len() < needed {
        return Err(CodecError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }
    for (chunk, dst) in input.chunks(3).zip(out.chunks_exact_mut(4)) {
        dst.copy_from_slice(&encode_group(chunk));
    }
    Ok(needed)
}

// ---- Decode ----

/// Look up every character of `text`, rejecting anything outside the alphabet and checking that
/// padding is only a one- or two-character suffix of the final group. Returns the 6-bit values.
fn validate(text: &[u8]) -> Result<Vec<u8>, CodecError> {
    if !text.len().is_multiple_of(4) {
        return Err(CodecError::InvalidLength(text.len()));
    }
    let mut values = Vec::with_capacity(text.len());
    let mut first_pad: Option<usize> = None;
    for (offset, &byte) in text.iter().enumerate() {
        let v = DECODE_TABLE[byte as usize];
        if v == INVALID {
            return Err(CodecError::InvalidCharacter { byte, offset });
        }
        match (v == PAD_INDEX, first_pad) {
            (true, None) => first_pad = Some(offset),
            (false, Some(_)) => return Err(CodecError::InvalidPadding { offset }),
            _ => {}
        }
        values.push(v);
    }
    if let Some(offset) = first_pad {
        // `=` may only sit in positions 2 or 3 of the last group.
        if offset + 2 < text.len() || offset % 4 < 2 {
            return Err(CodecError::InvalidPadding { offset });
        }
    }
    Ok(values)
}

fn decoded_len_of(values: &[u8]) -> usize {
    let pads = values.iter().rev().take_while(|&&v| v == PAD_INDEX).count();
    values.len() / 4 * 3 - pads
}

/// Exact decoded length of `text`, after validating it.
pub fn decoded_len(text: impl AsRef<[u8]>) -> Result<usize, CodecError> {
    validate(text.as_ref()).map(|v| decoded_len_of(&v))
}

/// Emit up to 3 bytes for one group; stops at the first padding value.
fn decode_group(c: &[u8], mut emit: impl FnMut(u8)) {
    emit((c[0] << 2) | (c[1] >> 4));
    if c[2] == PAD_INDEX {
        return;
    }
    emit((c[1] << 4) | (c[2] >> 2));
    if c[3] == PAD_INDEX {
        return;
    }
    emit((c[2] << 6) | c[3]);
}

/// Decode base64 `text` into a new byte vector.
pub fn decode(text: impl AsRef<[u8]>) -> Result<Vec<u8>, CodecError> {
    let values = validate(text.as_ref())?;
    let mut out = Vec::with_capacity(decoded_len_of(&values));
    for group in values.chunks_exact(4) {
        decode_group(group, |b| out.push(b));
    }
    Ok(out)
}

/// Decode `text` into `out`, returning the exact number of bytes written.
///
/// Nothing is written unless the whole input is valid and `out` can hold the result.
pub fn decode_into(text: impl AsRef<[u8]>, out: &mut [u8]) -> Result<usize, CodecError> {
    let values = validate(text.as_ref())?;
    let needed = decoded_len_of(&values);
    if out.len() < needed {
        return Err(CodecError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }
    let mut written = 0;
    for group in values.chunks_exact(4) {
        decode_group(group, |b| {
            out[written] = b;
            written += 1;
        });
    }
    Ok(written)
}
