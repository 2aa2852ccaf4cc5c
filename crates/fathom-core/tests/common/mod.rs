#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use fathom_core::io::metadata::METADATA_COLUMNS;
use ndarray::Array2;
use tempfile::TempDir;

/// One ping to write into a synthetic survey.
pub struct Ping {
    pub channel: Option<u32>,
    pub seq: i64,
    pub payload: Vec<u8>,
}

impl Ping {
    pub fn new(channel: u32, seq: i64, payload: Vec<u8>) -> Self {
        Self {
            channel: Some(channel),
            seq,
            payload,
        }
    }
}

/// A metadata table and binary survey on disk.
pub struct SurveyFixture {
    pub dir: TempDir,
    pub metadata: PathBuf,
    pub survey: PathBuf,
}

/// Header line with every required column.
pub fn csv_header() -> String {
    METADATA_COLUMNS.join(",")
}

/// A data row in header order. `extras` is written verbatim, so quote it
/// if it contains commas.
pub fn csv_row(
    ofs: u64,
    channel: Option<u32>,
    seq: i64,
    payload: Option<(u64, u64)>,
    extras: &str,
) -> String {
    let channel = channel.map(|c| c.to_string()).unwrap_or_default();
    let (sonar_ofs, sonar_size) = match payload {
        Some((o, s)) => (o.to_string(), s.to_string()),
        None => (String::new(), String::new()),
    };
    format!(
        "{ofs},{channel},{seq},{time},45.5,-122.6,12.3,,{sonar_ofs},{sonar_size},,,,,,,,{extras}",
        time = seq * 100
    )
}

/// Write the pings into a survey binary (payloads back to back) and a
/// matching metadata table. Pings with an empty payload get a blank range.
pub fn write_survey(pings: &[Ping]) -> SurveyFixture {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("survey.csv");
    let survey = dir.path().join("survey.bin");

    let mut binary = Vec::new();
    let mut lines = vec![csv_header()];
    for (i, ping) in pings.iter().enumerate() {
        let range = if ping.payload.is_empty() {
            None
        } else {
            Some((binary.len() as u64, ping.payload.len() as u64))
        };
        binary.extend_from_slice(&ping.payload);
        lines.push(csv_row(i as u64 * 64, ping.channel, ping.seq, range, ""));
    }

    if binary.is_empty() {
        // Keep the file mappable.
        binary.push(0);
    }
    fs::write(&survey, binary).unwrap();
    fs::write(&metadata, lines.join("\n") + "\n").unwrap();
    SurveyFixture {
        dir,
        metadata,
        survey,
    }
}

/// Deterministic pseudo-random bytes (64-bit LCG, high byte).
pub fn texture(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}

/// Row seen by ping `ping` of a feature moving one sample per ping:
/// `row[j] = texture[j + 100 - ping]`.
pub fn moving_row(texture: &[u8], ping: usize, width: usize) -> Vec<u8> {
    (0..width).map(|j| texture[j + 100 - ping]).collect()
}

/// Two channels whose right side lags the left by `lag` pings.
///
/// Left record `i` carries ping `i + 10`, right record `i` carries ping
/// `i + 10 - lag`.
pub fn lagged_survey(records: usize, width: usize, lag: usize) -> SurveyFixture {
    let tex = texture(width + 200, 7);
    let mut pings = Vec::new();
    for i in 0..records {
        pings.push(Ping::new(0, i as i64, moving_row(&tex, i + 10, width)));
        pings.push(Ping::new(1, i as i64, moving_row(&tex, i + 10 - lag, width)));
    }
    write_survey(&pings)
}

/// A `rows x width` random image.
pub fn texture_image(rows: usize, width: usize, seed: u64) -> Array2<u8> {
    Array2::from_shape_vec((rows, width), texture(rows * width, seed)).unwrap()
}

/// Right half is the left half moved `shift` columns right, zero filled.
pub fn shifted_halves(rows: usize, half: usize, shift: usize) -> (Array2<u8>, Array2<u8>) {
    let left = texture_image(rows, half, 11);
    let mut right = Array2::<u8>::zeros((rows, half));
    for r in 0..rows {
        for c in shift..half {
            right[[r, c]] = left[[r, c - shift]];
        }
    }
    (left, right)
}

/// Join two halves into one merged strip.
pub fn merge(left: &Array2<u8>, right: &Array2<u8>) -> Array2<u8> {
    let rows = left.nrows();
    let (wl, wr) = (left.ncols(), right.ncols());
    Array2::from_shape_fn((rows, wl + wr), |(r, c)| {
        if c < wl {
            left[[r, c]]
        } else {
            right[[r, c - wl]]
        }
    })
}
