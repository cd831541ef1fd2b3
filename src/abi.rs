//! Minimal ABI codec for the task board contract
//!
//! The contract returns a closed set of solidity types (uint256, bool,
//! address, string), so this module implements exactly that subset instead
//! of pulling in a full ABI library:
//! - `Word`: one 32-byte big-endian stack word with exact decimal rendering
//! - calldata building (fixed selector + uint256 arguments)
//! - return-data decoding driven by an explicit field list

use std::fmt;

use thiserror::Error;

/// Size of one ABI stack word in bytes.
pub const WORD_BYTES: usize = 32;

// ==================== Function Selectors ====================
//
// First four bytes of keccak-256 over the canonical signature. Pinned as
// constants; the contract surface is fixed per deployment.

/// `getTasksCount()` - current task count accessor.
pub const SEL_GET_TASKS_COUNT: [u8; 4] = [0x9f, 0x89, 0x92, 0x73];

/// `taskCounter()` - legacy task count accessor.
pub const SEL_TASK_COUNTER: [u8; 4] = [0x58, 0x67, 0x17, 0x30];

/// `getTask(uint256)` - single record accessor.
pub const SEL_GET_TASK: [u8; 4] = [0x1d, 0x65, 0xe7, 0x7e];

/// ABI decode failure.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("empty return data")]
    Empty,

    #[error("return data too short: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },

    #[error("dynamic offset {offset} out of range for {len}-byte payload")]
    BadOffset { offset: u64, len: usize },

    #[error("boolean word is not 0 or 1")]
    BadBool,

    #[error("address word has nonzero padding")]
    BadAddress,

    #[error("string payload is not valid UTF-8")]
    BadUtf8,

    #[error("value does not fit in the requested integer width")]
    Overflow,
}

// ==================== Word ====================

/// A single 32-byte big-endian ABI word (a uint256).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Word([u8; WORD_BYTES]);

impl Word {
    pub const ZERO: Word = Word([0u8; WORD_BYTES]);

    pub fn from_be_bytes(bytes: [u8; WORD_BYTES]) -> Self {
        Word(bytes)
    }

    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; WORD_BYTES];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Word(bytes)
    }

    pub fn from_u128(value: u128) -> Self {
        let mut bytes = [0u8; WORD_BYTES];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Word(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; WORD_BYTES] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Narrow to u64; `None` when the value does not fit.
    pub fn as_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|&b| b != 0) {
            return None;
        }
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(tail))
    }

    /// Narrow to u128; `None` when the value does not fit.
    pub fn as_u128(&self) -> Option<u128> {
        if self.0[..16].iter().any(|&b| b != 0) {
            return None;
        }
        let mut tail = [0u8; 16];
        tail.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(tail))
    }

    /// Exact decimal rendering of the full 256-bit value.
    ///
    /// Repeated division by ten over the byte array, so values beyond the
    /// u128 range render without precision loss.
    pub fn to_decimal(&self) -> String {
        let mut scratch = self.0;
        let mut digits = Vec::new();
        loop {
            let mut rem: u32 = 0;
            for byte in scratch.iter_mut() {
                let cur = rem * 256 + u32::from(*byte);
                *byte = (cur / 10) as u8;
                rem = cur % 10;
            }
            digits.push(b'0' + rem as u8);
            if scratch.iter().all(|&b| b == 0) {
                break;
            }
        }
        digits.reverse();
        String::from_utf8(digits).unwrap_or_else(|_| "0".to_string())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.to_decimal())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

// ==================== Calldata ====================

/// Build `0x`-prefixed calldata: selector followed by uint256 arguments.
pub fn encode_call(selector: [u8; 4], args: &[Word]) -> String {
    let mut data = Vec::with_capacity(4 + args.len() * WORD_BYTES);
    data.extend_from_slice(&selector);
    for arg in args {
        data.extend_from_slice(arg.as_bytes());
    }
    format!("0x{}", hex::encode(data))
}

// ==================== Return-data decoding ====================

/// Field types this codec can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Uint,
    Bool,
    Address,
    Str,
}

/// One decoded positional value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Uint(Word),
    Bool(bool),
    Address(String),
    Str(String),
}

/// Decode return data against an explicit field list.
///
/// Head slots are read positionally; `Str` fields are dynamic and follow
/// their head offset into the tail. Strict on padding (booleans must be
/// 0/1, addresses must have a zero 12-byte prefix) so that decoding under
/// the wrong field list fails instead of producing garbage.
pub fn decode_fields(data: &[u8], fields: &[FieldKind]) -> Result<Vec<RawValue>, AbiError> {
    if data.is_empty() {
        return Err(AbiError::Empty);
    }
    let need = fields.len() * WORD_BYTES;
    if data.len() < need {
        return Err(AbiError::Truncated {
            need,
            have: data.len(),
        });
    }

    let mut values = Vec::with_capacity(fields.len());
    for (slot, kind) in fields.iter().enumerate() {
        let word = word_at(data, slot * WORD_BYTES)?;
        let value = match kind {
            FieldKind::Uint => RawValue::Uint(word),
            FieldKind::Bool => RawValue::Bool(decode_bool(&word)?),
            FieldKind::Address => RawValue::Address(decode_address(&word)?),
            FieldKind::Str => RawValue::Str(decode_string(data, &word)?),
        };
        values.push(value);
    }
    Ok(values)
}

/// Decode a single uint256 return (count accessors).
pub fn decode_uint(data: &[u8]) -> Result<Word, AbiError> {
    if data.is_empty() {
        return Err(AbiError::Empty);
    }
    word_at(data, 0)
}

fn word_at(data: &[u8], offset: usize) -> Result<Word, AbiError> {
    let end = offset.checked_add(WORD_BYTES).ok_or(AbiError::Overflow)?;
    if data.len() < end {
        return Err(AbiError::Truncated {
            need: end,
            have: data.len(),
        });
    }
    let mut bytes = [0u8; WORD_BYTES];
    bytes.copy_from_slice(&data[offset..end]);
    Ok(Word::from_be_bytes(bytes))
}

fn decode_bool(word: &Word) -> Result<bool, AbiError> {
    let bytes = word.as_bytes();
    if bytes[..31].iter().any(|&b| b != 0) || bytes[31] > 1 {
        return Err(AbiError::BadBool);
    }
    Ok(bytes[31] == 1)
}

fn decode_address(word: &Word) -> Result<String, AbiError> {
    let bytes = word.as_bytes();
    if bytes[..12].iter().any(|&b| b != 0) {
        return Err(AbiError::BadAddress);
    }
    Ok(format!("0x{}", hex::encode(&bytes[12..])))
}

fn decode_string(data: &[u8], head: &Word) -> Result<String, AbiError> {
    let offset = head.as_u64().ok_or(AbiError::BadOffset {
        offset: u64::MAX,
        len: data.len(),
    })?;
    let offset_usize = usize::try_from(offset).map_err(|_| AbiError::BadOffset {
        offset,
        len: data.len(),
    })?;
    let head_end = offset_usize
        .checked_add(WORD_BYTES)
        .ok_or(AbiError::Overflow)?;
    if head_end > data.len() {
        return Err(AbiError::BadOffset {
            offset,
            len: data.len(),
        });
    }

    let len_word = word_at(data, offset_usize)?;
    let len = len_word
        .as_u64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or(AbiError::Overflow)?;
    let start = offset_usize + WORD_BYTES;
    let end = start.checked_add(len).ok_or(AbiError::Overflow)?;
    if end > data.len() {
        return Err(AbiError::Truncated {
            need: end,
            have: data.len(),
        });
    }

    std::str::from_utf8(&data[start..end])
        .map(|s| s.to_string())
        .map_err(|_| AbiError::BadUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_hex(word: &Word) -> String {
        hex::encode(word.as_bytes())
    }

    #[test]
    fn test_word_decimal_small() {
        assert_eq!(Word::ZERO.to_decimal(), "0");
        assert_eq!(Word::from_u64(42).to_decimal(), "42");
        assert_eq!(Word::from_u64(u64::MAX).to_decimal(), "18446744073709551615");
    }

    #[test]
    fn test_word_decimal_beyond_u128() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x80; // 2^255
        let word = Word::from_be_bytes(bytes);
        assert_eq!(
            word.to_decimal(),
            "57896044618658097711785492504343953926634992332820282019728792003956564819968"
        );
        assert!(word.as_u128().is_none());
    }

    #[test]
    fn test_word_narrowing() {
        assert_eq!(Word::from_u64(7).as_u64(), Some(7));
        let big = Word::from_u128(u128::from(u64::MAX) + 1);
        assert!(big.as_u64().is_none());
        assert_eq!(big.as_u128(), Some(u128::from(u64::MAX) + 1));
    }

    #[test]
    fn test_encode_call_with_arg() {
        let calldata = encode_call(SEL_GET_TASK, &[Word::from_u64(3)]);
        assert_eq!(
            calldata,
            format!("0x1d65e77e{}", word_hex(&Word::from_u64(3)))
        );
        assert_eq!(calldata.len(), 2 + 8 + 64);
    }

    #[test]
    fn test_encode_call_no_args() {
        assert_eq!(encode_call(SEL_GET_TASKS_COUNT, &[]), "0x9f899273");
    }

    #[test]
    fn test_decode_uint() {
        let word = decode_uint(Word::from_u64(12).as_bytes()).unwrap();
        assert_eq!(word.as_u64(), Some(12));
        assert!(matches!(decode_uint(&[]), Err(AbiError::Empty)));
    }

    #[test]
    fn test_decode_bool_strictness() {
        let err = decode_fields(Word::from_u64(2).as_bytes(), &[FieldKind::Bool]).unwrap_err();
        assert!(matches!(err, AbiError::BadBool));

        let ok = decode_fields(Word::from_u64(1).as_bytes(), &[FieldKind::Bool]).unwrap();
        assert_eq!(ok, vec![RawValue::Bool(true)]);
    }

    #[test]
    fn test_decode_address_padding() {
        let mut bytes = [0u8; 32];
        bytes[11] = 0xff; // inside the must-be-zero prefix
        let err = decode_fields(&bytes, &[FieldKind::Address]).unwrap_err();
        assert!(matches!(err, AbiError::BadAddress));

        let mut bytes = [0u8; 32];
        for (i, b) in bytes[12..].iter_mut().enumerate() {
            *b = i as u8;
        }
        let values = decode_fields(&bytes, &[FieldKind::Address]).unwrap();
        assert_eq!(
            values,
            vec![RawValue::Address(
                "0x000102030405060708090a0b0c0d0e0f10111213".to_string()
            )]
        );
    }

    #[test]
    fn test_decode_uint_and_string() {
        // (uint256 7, string "fix bug"): head = [7, offset 64], tail = len + padded bytes
        let mut data = Vec::new();
        data.extend_from_slice(Word::from_u64(7).as_bytes());
        data.extend_from_slice(Word::from_u64(64).as_bytes());
        data.extend_from_slice(Word::from_u64(7).as_bytes());
        let mut text = b"fix bug".to_vec();
        text.resize(32, 0);
        data.extend_from_slice(&text);

        let values = decode_fields(&data, &[FieldKind::Uint, FieldKind::Str]).unwrap();
        assert_eq!(values[0], RawValue::Uint(Word::from_u64(7)));
        assert_eq!(values[1], RawValue::Str("fix bug".to_string()));
    }

    #[test]
    fn test_decode_string_bad_offset() {
        let err =
            decode_fields(Word::from_u64(4096).as_bytes(), &[FieldKind::Str]).unwrap_err();
        assert!(matches!(err, AbiError::BadOffset { .. }));
    }

    #[test]
    fn test_decode_truncated_head() {
        let data = vec![0u8; 32];
        let err = decode_fields(&data, &[FieldKind::Uint, FieldKind::Uint]).unwrap_err();
        assert!(matches!(err, AbiError::Truncated { .. }));
    }
}
