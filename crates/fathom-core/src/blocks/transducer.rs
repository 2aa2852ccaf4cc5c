use serde::Serialize;

use crate::consts::SERIAL_SCAN_RECORDS;
use crate::record::Record;

use super::split_by_channel;

/// Sonar geometry inferred from channel cardinality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ScanType {
    Unknown,
    SingleSideScan,
    DualSideScan,
    MultibeamOrChirp,
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::SingleSideScan => write!(f, "Single side-scan"),
            Self::DualSideScan => write!(f, "Dual side-scan"),
            Self::MultibeamOrChirp => write!(f, "Multibeam / CHIRP"),
        }
    }
}

/// Heuristic transducer description.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransducerConfig {
    pub scan_type: ScanType,
    pub channels: Vec<u32>,
    /// Suggested (left, right) channel pairs; empty when nothing is confident.
    pub suggested_pairs: Vec<(u32, u32)>,
    pub transducer_serial: Option<String>,
}

/// Infer scan type, channel pairings and serial number. Never fails.
pub fn detect_transducer_config(records: &[Record]) -> TransducerConfig {
    let channels: Vec<u32> = split_by_channel(records).into_keys().collect();

    let (scan_type, suggested_pairs) = match channels.len() {
        0 => (ScanType::Unknown, Vec::new()),
        1 => (ScanType::SingleSideScan, Vec::new()),
        2 => (ScanType::DualSideScan, vec![(channels[0], channels[1])]),
        _ => (
            ScanType::MultibeamOrChirp,
            channels
                .chunks_exact(2)
                .map(|pair| (pair[0], pair[1]))
                .collect(),
        ),
    };

    TransducerConfig {
        scan_type,
        channels,
        suggested_pairs,
        transducer_serial: find_serial(records),
    }
}

fn find_serial(records: &[Record]) -> Option<String> {
    records
        .iter()
        .take(SERIAL_SCAN_RECORDS)
        .flat_map(|r| r.extras.iter())
        .find_map(|(key, value)| {
            if key.to_lowercase().contains("serial") {
                value.as_str().map(str::to_string)
            } else {
                None
            }
        })
}
