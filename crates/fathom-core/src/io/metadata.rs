use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{FathomError, ParseSkip, Result};
use crate::record::{Extras, Record};

/// Columns every metadata table must carry, in any order.
pub const METADATA_COLUMNS: [&str; 18] = [
    "ofs",
    "channel_id",
    "seq",
    "time_ms",
    "lat",
    "lon",
    "depth_m",
    "sample_cnt",
    "sonar_ofs",
    "sonar_size",
    "beam_deg",
    "pitch_deg",
    "roll_deg",
    "heave_m",
    "tx_ofs_m",
    "rx_ofs_m",
    "color_id",
    "extras_json",
];

/// One metadata row as text, before numeric parsing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetadataRow {
    pub ofs: String,
    pub channel_id: String,
    pub seq: String,
    pub time_ms: String,
    pub lat: String,
    pub lon: String,
    pub depth_m: String,
    pub sample_cnt: String,
    pub sonar_ofs: String,
    pub sonar_size: String,
    pub beam_deg: String,
    pub pitch_deg: String,
    pub roll_deg: String,
    pub heave_m: String,
    pub tx_ofs_m: String,
    pub rx_ofs_m: String,
    pub color_id: String,
    pub extras_json: String,
}

/// Parsed records plus the number of rows that were dropped.
#[derive(Clone, Debug, Default)]
pub struct RecordSet {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Read the metadata table at `path`.
pub fn read_records(path: &Path) -> Result<RecordSet> {
    let file = File::open(path)?;
    read_records_from_reader(BufReader::new(file))
}

/// Read a metadata table from any reader.
///
/// Rows with unparsable numeric fields are skipped and counted. Only a
/// header missing one of [`METADATA_COLUMNS`] is an error.
pub fn read_records_from_reader<R: Read>(reader: R) -> Result<RecordSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<&str> = METADATA_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(FathomError::InvalidMetadata(format!(
            "missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut set = RecordSet::default();
    for (index, row) in rdr.deserialize::<MetadataRow>().enumerate() {
        let parsed = row
            .map_err(|e| ParseSkip::Malformed(e.to_string()))
            .and_then(|raw| parse_row(&raw));
        match parsed {
            Ok(record) => set.records.push(record),
            Err(reason) => {
                set.skipped += 1;
                debug!(row = index + 1, %reason, "Skipping metadata row");
            }
        }
    }

    info!(
        records = set.records.len(),
        skipped = set.skipped,
        "Metadata table parsed"
    );
    Ok(set)
}

/// Convert one text row into a [`Record`].
pub fn parse_row(row: &MetadataRow) -> std::result::Result<Record, ParseSkip> {
    Ok(Record {
        ofs: opt_u64("ofs", &row.ofs)?.unwrap_or(0),
        channel_id: opt_u32("channel_id", &row.channel_id)?,
        seq: opt_i64("seq", &row.seq)?.unwrap_or(0),
        time_ms: opt_i64("time_ms", &row.time_ms)?.unwrap_or(0),
        lat: opt_f64("lat", &row.lat)?,
        lon: opt_f64("lon", &row.lon)?,
        depth_m: opt_f64("depth_m", &row.depth_m)?,
        sample_cnt: opt_u32("sample_cnt", &row.sample_cnt)?,
        sonar_ofs: opt_u64("sonar_ofs", &row.sonar_ofs)?,
        sonar_size: opt_u64("sonar_size", &row.sonar_size)?,
        beam_deg: opt_f64("beam_deg", &row.beam_deg)?,
        pitch_deg: opt_f64("pitch_deg", &row.pitch_deg)?,
        roll_deg: opt_f64("roll_deg", &row.roll_deg)?,
        heave_m: opt_f64("heave_m", &row.heave_m)?,
        tx_ofs_m: opt_f64("tx_ofs_m", &row.tx_ofs_m)?,
        rx_ofs_m: opt_f64("rx_ofs_m", &row.rx_ofs_m)?,
        color_id: opt_i64("color_id", &row.color_id)?,
        extras: parse_extras(&row.extras_json),
    })
}

/// Parse the extension map. Anything but a JSON object yields an empty map.
pub fn parse_extras(text: &str) -> Extras {
    let text = text.trim();
    if text.is_empty() {
        return Extras::new();
    }
    match serde_json::from_str::<Extras>(text) {
        Ok(map) => map,
        Err(e) => {
            debug!(error = %e, "Ignoring malformed extras_json");
            Extras::new()
        }
    }
}

fn bad(field: &'static str, value: &str) -> ParseSkip {
    ParseSkip::BadNumber {
        field,
        value: value.to_string(),
    }
}

fn opt_f64(field: &'static str, value: &str) -> std::result::Result<Option<f64>, ParseSkip> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| bad(field, value))
}

/// Integers also accept integral float literals such as `12.0`.
fn opt_i64(field: &'static str, value: &str) -> std::result::Result<Option<i64>, ParseSkip> {
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = value.parse::<i64>() {
        return Ok(Some(v));
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(bad(field, value)),
    }
}

fn opt_u64(field: &'static str, value: &str) -> std::result::Result<Option<u64>, ParseSkip> {
    match opt_i64(field, value)? {
        None => Ok(None),
        Some(v) => u64::try_from(v).map(Some).map_err(|_| bad(field, value)),
    }
}

fn opt_u32(field: &'static str, value: &str) -> std::result::Result<Option<u32>, ParseSkip> {
    match opt_i64(field, value)? {
        None => Ok(None),
        Some(v) => u32::try_from(v).map(Some).map_err(|_| bad(field, value)),
    }
}
