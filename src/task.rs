//! Canonical task model and record normalization
//!
//! The contract has returned two record layouts across its evolution:
//! - v2 (current): `(id, title, description, reward, completed, worker, creator)`
//! - v1 (legacy):  `(id, description, reward, completed, worker, creator)`
//!
//! Both are mapped into one canonical [`Task`]. Layout selection is
//! deterministic: the v2 interpretation is attempted first, anything else
//! falls back to v1 with positional defaults. Status is always derived
//! from `(completed, worker)` and never read out of the record.

use serde::Serialize;
use std::fmt;

use crate::abi::{FieldKind, RawValue, Word};

/// The "unassigned" sentinel address.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Smallest-unit scale of the reward token (ether-style, 10^18).
pub const REWARD_DECIMALS: i32 = 18;

// ==================== Record layouts ====================

/// Known record layouts, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// `(id, title, description, reward, completed, worker, creator)`
    V2,
    /// `(id, description, reward, completed, worker, creator)`
    V1,
}

impl RecordLayout {
    /// Decode order: newest layout first, legacy as fallback.
    pub const DECODE_ORDER: [RecordLayout; 2] = [RecordLayout::V2, RecordLayout::V1];

    pub const fn fields(&self) -> &'static [FieldKind] {
        match self {
            RecordLayout::V2 => &[
                FieldKind::Uint,
                FieldKind::Str,
                FieldKind::Str,
                FieldKind::Uint,
                FieldKind::Bool,
                FieldKind::Address,
                FieldKind::Address,
            ],
            RecordLayout::V1 => &[
                FieldKind::Uint,
                FieldKind::Str,
                FieldKind::Uint,
                FieldKind::Bool,
                FieldKind::Address,
                FieldKind::Address,
            ],
        }
    }

    pub const fn arity(&self) -> usize {
        self.fields().len()
    }
}

/// One record as returned by the ledger: positional values, shape unknown
/// until normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord(pub Vec<RawValue>);

impl RawRecord {
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    fn uint_at(&self, index: usize) -> Option<Word> {
        match self.0.get(index) {
            Some(RawValue::Uint(word)) => Some(*word),
            _ => None,
        }
    }

    fn str_at(&self, index: usize) -> Option<&str> {
        match self.0.get(index) {
            Some(RawValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn bool_at(&self, index: usize) -> Option<bool> {
        match self.0.get(index) {
            Some(RawValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    fn address_at(&self, index: usize) -> Option<&str> {
        match self.0.get(index) {
            Some(RawValue::Address(a)) => Some(a.as_str()),
            _ => None,
        }
    }
}

// ==================== Canonical task ====================

/// Task lifecycle state, derived from `(completed, worker)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    Available,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Total derivation over the two stored fields:
    /// completed wins, then assignment decides.
    pub fn derive(completed: bool, worker: &str) -> Self {
        if completed {
            TaskStatus::Completed
        } else if is_zero_address(worker) {
            TaskStatus::Available
        } else {
            TaskStatus::InProgress
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, TaskStatus::Available | TaskStatus::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Available => "Available",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

/// Human-scaled reward: a number when the raw amount parses and scales,
/// otherwise the raw string unchanged. Serialized untagged so consumers
/// see a JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RewardDisplay {
    Scaled(f64),
    Raw(String),
}

impl fmt::Display for RewardDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewardDisplay::Scaled(value) => write!(f, "{}", value),
            RewardDisplay::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Canonical task entity. Built fresh on every query, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Exact smallest-unit amount, stringified to avoid precision loss.
    pub reward_raw: String,
    pub reward_display: RewardDisplay,
    pub completed: bool,
    pub worker: String,
    pub creator: String,
    pub status: TaskStatus,
}

impl Task {
    pub fn matches_creator(&self, address: &str) -> bool {
        self.creator.eq_ignore_ascii_case(address)
    }

    pub fn matches_worker(&self, address: &str) -> bool {
        self.worker.eq_ignore_ascii_case(address)
    }
}

/// Address equality against the zero sentinel, case-insensitive since hex
/// addresses may be checksum-cased.
pub fn is_zero_address(address: &str) -> bool {
    address.eq_ignore_ascii_case(ZERO_ADDRESS)
}

// ==================== Normalization ====================

/// Map a raw record into a canonical [`Task`]. Total: a record that does
/// not match the v2 shape is read under the v1 interpretation, with
/// positionally appropriate defaults for anything missing.
pub fn normalize(raw: &RawRecord) -> Task {
    if raw.arity() == RecordLayout::V2.arity() && raw.str_at(1).is_some() && raw.str_at(2).is_some()
    {
        build_task(
            raw.uint_at(0),
            raw.str_at(1),
            raw.str_at(2),
            raw.uint_at(3),
            raw.bool_at(4),
            raw.address_at(5),
            raw.address_at(6),
        )
    } else {
        // v1: no title field, everything shifts up one slot
        build_task(
            raw.uint_at(0),
            None,
            raw.str_at(1),
            raw.uint_at(2),
            raw.bool_at(3),
            raw.address_at(4),
            raw.address_at(5),
        )
    }
}

fn build_task(
    id: Option<Word>,
    title: Option<&str>,
    description: Option<&str>,
    reward: Option<Word>,
    completed: Option<bool>,
    worker: Option<&str>,
    creator: Option<&str>,
) -> Task {
    let reward = reward.unwrap_or(Word::ZERO);
    let reward_raw = reward.to_decimal();
    let completed = completed.unwrap_or(false);
    let worker = worker.unwrap_or(ZERO_ADDRESS).to_string();

    Task {
        id: id.and_then(|w| w.as_u64()).unwrap_or(0),
        title: title.unwrap_or("(no title)").to_string(),
        description: description.unwrap_or_default().to_string(),
        reward_display: scale_reward(&reward, &reward_raw),
        reward_raw,
        completed,
        status: TaskStatus::derive(completed, &worker),
        worker,
        creator: creator.unwrap_or(ZERO_ADDRESS).to_string(),
    }
}

/// Ether-style scaling: divide by 10^18 when the amount fits an integer
/// width we can scale; otherwise hand back the raw string.
fn scale_reward(reward: &Word, raw: &str) -> RewardDisplay {
    match reward.as_u128() {
        Some(value) => RewardDisplay::Scaled(value as f64 / 10f64.powi(REWARD_DECIMALS)),
        None => RewardDisplay::Raw(raw.to_string()),
    }
}
