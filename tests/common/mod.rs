//! Shared helpers for integration tests: hand-rolled ABI encoding of
//! contract return data, shaped exactly like the deployed task contract's
//! responses.

const WORD: usize = 32;

fn push_u64(out: &mut Vec<u8>, value: u64) {
    let mut word = [0u8; WORD];
    word[24..].copy_from_slice(&value.to_be_bytes());
    out.extend_from_slice(&word);
}

fn push_u128(out: &mut Vec<u8>, value: u128) {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    out.extend_from_slice(&word);
}

fn push_address(out: &mut Vec<u8>, address: &str) {
    let stripped = address.strip_prefix("0x").unwrap_or(address);
    let bytes = hex::decode(stripped).expect("valid address hex");
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(&bytes);
}

fn string_tail(text: &str) -> Vec<u8> {
    let mut tail = Vec::new();
    push_u64(&mut tail, text.len() as u64);
    let mut padded = text.as_bytes().to_vec();
    padded.resize(text.len().div_ceil(WORD) * WORD, 0);
    tail.extend_from_slice(&padded);
    tail
}

/// `0x`-prefixed uint256 return (count accessors).
pub fn uint_result(value: u64) -> String {
    let mut out = Vec::new();
    push_u64(&mut out, value);
    format!("0x{}", hex::encode(out))
}

/// `0x`-prefixed v2 record return:
/// `(id, title, description, reward, completed, worker, creator)`.
pub fn v2_record_result(
    id: u64,
    title: &str,
    description: &str,
    reward: u128,
    completed: bool,
    worker: &str,
    creator: &str,
) -> String {
    let head_len = 7 * WORD;
    let title_tail = string_tail(title);
    let description_tail = string_tail(description);

    let mut out = Vec::new();
    push_u64(&mut out, id);
    push_u64(&mut out, head_len as u64); // title offset
    push_u64(&mut out, (head_len + title_tail.len()) as u64); // description offset
    push_u128(&mut out, reward);
    push_u64(&mut out, u64::from(completed));
    push_address(&mut out, worker);
    push_address(&mut out, creator);
    out.extend_from_slice(&title_tail);
    out.extend_from_slice(&description_tail);
    format!("0x{}", hex::encode(out))
}

/// `0x`-prefixed v1 record return (no title field):
/// `(id, description, reward, completed, worker, creator)`.
pub fn v1_record_result(
    id: u64,
    description: &str,
    reward: u128,
    completed: bool,
    worker: &str,
    creator: &str,
) -> String {
    let head_len = 6 * WORD;
    let description_tail = string_tail(description);

    let mut out = Vec::new();
    push_u64(&mut out, id);
    push_u64(&mut out, head_len as u64); // description offset
    push_u128(&mut out, reward);
    push_u64(&mut out, u64::from(completed));
    push_address(&mut out, worker);
    push_address(&mut out, creator);
    out.extend_from_slice(&description_tail);
    format!("0x{}", hex::encode(out))
}

/// Calldata for `getTask(id)`, used to match per-id mocks.
pub fn get_task_calldata(id: u64) -> String {
    let mut arg = Vec::new();
    push_u64(&mut arg, id);
    format!("0x1d65e77e{}", hex::encode(arg))
}
