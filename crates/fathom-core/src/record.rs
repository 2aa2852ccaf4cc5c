use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Vendor-specific key/value fields carried alongside a record.
pub type Extras = BTreeMap<String, serde_json::Value>;

/// Metadata for one acoustic ping.
///
/// Absent numeric fields are `None`; `ofs`, `seq` and `time_ms` default to 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    /// Offset of the ping header in the original survey file.
    pub ofs: u64,
    pub channel_id: Option<u32>,
    pub seq: i64,
    pub time_ms: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub depth_m: Option<f64>,
    pub sample_cnt: Option<u32>,
    /// Byte range of the raw intensity samples in the binary survey file.
    pub sonar_ofs: Option<u64>,
    pub sonar_size: Option<u64>,
    pub beam_deg: Option<f64>,
    pub pitch_deg: Option<f64>,
    pub roll_deg: Option<f64>,
    pub heave_m: Option<f64>,
    pub tx_ofs_m: Option<f64>,
    pub rx_ofs_m: Option<f64>,
    pub color_id: Option<i64>,
    pub extras: Extras,
}

impl Record {
    /// Payload byte range, if the record addresses one.
    ///
    /// A zero-length range is treated the same as a missing one.
    pub fn payload_range(&self) -> Option<(u64, u64)> {
        match (self.sonar_ofs, self.sonar_size) {
            (Some(ofs), Some(size)) if size > 0 => Some((ofs, size)),
            _ => None,
        }
    }
}

/// A contiguous, sequence-ordered run of records from one channel.
#[derive(Clone, Debug)]
pub struct Block {
    channel_id: u32,
    records: Vec<Record>,
}

impl Block {
    pub(crate) fn new(channel_id: u32, records: Vec<Record>) -> Self {
        Self {
            channel_id,
            records,
        }
    }

    pub fn channel_id(&self) -> u32 {
        self.channel_id
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last sequence numbers in the block.
    pub fn seq_span(&self) -> Option<(i64, i64)> {
        Some((self.records.first()?.seq, self.records.last()?.seq))
    }
}

/// Offset in ping indices between the left and right channel of a block pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowShift(pub i64);

/// Lateral offset in pixels between the two halves of a merged ping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelShift(pub i64);

impl std::fmt::Display for RowShift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+} rows", self.0)
    }
}

impl std::fmt::Display for PixelShift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}px", self.0)
    }
}

/// A left/right block pair with its inter-block alignment.
#[derive(Clone, Debug)]
pub struct BlockPair {
    pub left: Block,
    pub right: Block,
    pub shift: RowShift,
    /// In [0, 1].
    pub confidence: f64,
}
