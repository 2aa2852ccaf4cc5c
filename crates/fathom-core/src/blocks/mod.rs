pub mod transducer;

use std::collections::BTreeMap;

use tracing::debug;

use crate::consts::MIN_BLOCK_RECORDS;
use crate::record::{Block, Record};

pub use transducer::{detect_transducer_config, ScanType, TransducerConfig};

/// Group records by channel, each channel sorted by sequence number.
///
/// Records without a channel id are dropped.
pub fn split_by_channel(records: &[Record]) -> BTreeMap<u32, Vec<Record>> {
    let mut by_channel: BTreeMap<u32, Vec<Record>> = BTreeMap::new();
    for record in records {
        if let Some(channel) = record.channel_id {
            by_channel.entry(channel).or_default().push(record.clone());
        }
    }
    for channel_records in by_channel.values_mut() {
        channel_records.sort_by_key(|r| r.seq);
    }
    by_channel
}

/// Chunk one channel's records into blocks of `block_size`.
///
/// Chunks shorter than [`MIN_BLOCK_RECORDS`] are discarded; everything else
/// is kept in order with no duplication.
pub fn block_records(channel_id: u32, records: &[Record], block_size: usize) -> Vec<Block> {
    if block_size == 0 {
        return Vec::new();
    }
    let blocks: Vec<Block> = records
        .chunks(block_size)
        .filter(|chunk| chunk.len() >= MIN_BLOCK_RECORDS)
        .map(|chunk| Block::new(channel_id, chunk.to_vec()))
        .collect();
    debug!(
        channel = channel_id,
        records = records.len(),
        block_size,
        blocks = blocks.len(),
        "Channel blocked"
    );
    blocks
}

/// Pair left and right blocks by index, up to the shorter list.
pub fn pair_blocks(left: Vec<Block>, right: Vec<Block>) -> Vec<(Block, Block)> {
    left.into_iter().zip(right).collect()
}
