//! Sample newline-delimited JSON records.

use serde::{Deserialize, Serialize};

/// Fixed-shape record used by stream smoke tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub label: String,
    pub sequence: i64,
    pub active: bool,
}

impl Default for SampleRecord {
    fn default() -> Self {
        Self {
            label: "abcdefghijklmnopqrstuvwxyz".to_owned(),
            sequence: i64::MAX,
            active: true,
        }
    }
}

impl SampleRecord {
    /// JSON encoding of this record without a terminator.
    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("sample record serializes")
    }
}

/// Length in bytes of the default record's JSON encoding.
pub fn record_len() -> usize { SampleRecord::default().to_json().len() }

/// Concatenate `count` default records, each followed by `terminator`.
pub fn encode_records(count: usize, terminator: u8) -> Vec<u8> {
    let mut record = SampleRecord::default().to_json();
    record.push(terminator);
    record.repeat(count)
}

/// Concatenate numbered records, each followed by `terminator`.
///
/// Record `n` carries `sequence == n`, so decoded order can be checked.
pub fn encode_sequence(count: usize, terminator: u8) -> Vec<u8> {
    let mut out = Vec::new();
    for sequence in 0..count {
        let record = SampleRecord {
            sequence: i64::try_from(sequence).expect("sequence fits in i64"),
            ..SampleRecord::default()
        };
        out.extend(record.to_json());
        out.push(terminator);
    }
    out
}
