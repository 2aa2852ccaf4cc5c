mod common;

use std::io::Cursor;

use fathom_core::error::FathomError;
use fathom_core::io::metadata::{parse_extras, read_records_from_reader};
use fathom_core::io::{read_payload, read_records, SurveyFile};

use common::{csv_header, csv_row, write_survey, Ping};

fn table(rows: &[String]) -> String {
    let mut lines = vec![csv_header()];
    lines.extend(rows.iter().cloned());
    lines.join("\n") + "\n"
}

#[test]
fn test_reads_all_wellformed_rows() {
    let text = table(&[
        csv_row(0, Some(0), 1, Some((0, 16)), ""),
        csv_row(64, Some(1), 1, Some((16, 16)), ""),
    ]);
    let set = read_records_from_reader(Cursor::new(text)).unwrap();
    assert_eq!(set.records.len(), 2);
    assert_eq!(set.skipped, 0);

    let r = &set.records[1];
    assert_eq!(r.ofs, 64);
    assert_eq!(r.channel_id, Some(1));
    assert_eq!(r.time_ms, 100);
    assert_eq!(r.payload_range(), Some((16, 16)));
    assert_eq!(r.sample_cnt, None);
    assert!((r.depth_m.unwrap() - 12.3).abs() < 1e-12);
}

#[test]
fn test_bad_numeric_row_is_skipped() {
    let mut bad = csv_row(0, Some(0), 2, None, "");
    bad = bad.replacen("45.5", "north", 1);
    let text = table(&[csv_row(0, Some(0), 1, None, ""), bad]);
    let set = read_records_from_reader(Cursor::new(text)).unwrap();
    assert_eq!(set.records.len(), 1);
    assert_eq!(set.skipped, 1);
}

#[test]
fn test_integral_float_accepted_for_integers() {
    let row = csv_row(0, Some(0), 1, None, "").replacen(",1,100,", ",12.0,100,", 1);
    let set = read_records_from_reader(Cursor::new(table(&[row]))).unwrap();
    assert_eq!(set.records[0].seq, 12);

    let frac = csv_row(0, Some(0), 1, None, "").replacen(",1,100,", ",12.5,100,", 1);
    let set = read_records_from_reader(Cursor::new(table(&[frac]))).unwrap();
    assert_eq!(set.skipped, 1);
}

#[test]
fn test_missing_column_is_an_error() {
    let text = "ofs,channel_id,seq\n0,1,2\n";
    let err = read_records_from_reader(Cursor::new(text)).unwrap_err();
    assert!(matches!(err, FathomError::InvalidMetadata(_)));
}

#[test]
fn test_blank_channel_parses_as_none() {
    let text = table(&[csv_row(0, None, 1, None, "")]);
    let set = read_records_from_reader(Cursor::new(text)).unwrap();
    assert_eq!(set.records[0].channel_id, None);
}

#[test]
fn test_extras_object_is_parsed() {
    let row = csv_row(0, Some(0), 1, None, r#""{""serial_no"": ""SN-42"", ""gain"": 3}""#);
    let set = read_records_from_reader(Cursor::new(table(&[row]))).unwrap();
    let extras = &set.records[0].extras;
    assert_eq!(extras["serial_no"], "SN-42");
    assert_eq!(extras["gain"], 3);
}

#[test]
fn test_malformed_extras_yield_empty_map() {
    assert!(parse_extras("{not json").is_empty());
    assert!(parse_extras("[1, 2]").is_empty());
    assert!(parse_extras("   ").is_empty());
}

#[test]
fn test_read_records_from_file() {
    let fixture = write_survey(&[Ping::new(3, 0, vec![1, 2, 3]), Ping::new(3, 1, vec![])]);
    let set = read_records(&fixture.metadata).unwrap();
    assert_eq!(set.records.len(), 2);
    assert_eq!(set.records[0].payload_range(), Some((0, 3)));
    assert_eq!(set.records[1].payload_range(), None);
}

#[test]
fn test_read_payload_bounds() {
    let fixture = write_survey(&[Ping::new(0, 0, vec![9, 8, 7, 6])]);
    assert_eq!(read_payload(&fixture.survey, 1, 2), vec![8, 7]);
    assert_eq!(read_payload(&fixture.survey, 0, 4), vec![9, 8, 7, 6]);
    assert!(read_payload(&fixture.survey, 2, 10).is_empty());
    assert!(read_payload(&fixture.dir.path().join("missing.bin"), 0, 1).is_empty());
}

#[test]
fn test_read_payload_rejects_corrupt_size() {
    let fixture = write_survey(&[Ping::new(0, 0, vec![1; 16])]);
    assert!(read_payload(&fixture.survey, 0, u64::MAX / 2).is_empty());
    assert!(read_payload(&fixture.survey, 8, u64::MAX).is_empty());
    assert!(read_payload(&fixture.survey, 17, 0).is_empty());
    assert_eq!(read_payload(&fixture.survey, 12, 4), vec![1; 4]);
}

#[test]
fn test_survey_file_slices() {
    let fixture = write_survey(&[Ping::new(0, 0, vec![5; 32])]);
    let survey = SurveyFile::open(&fixture.survey).unwrap();
    assert_eq!(survey.len(), 32);
    assert_eq!(survey.slice(30, 2), &[5, 5]);
    assert!(survey.slice(31, 2).is_empty());
    assert!(survey.slice(u64::MAX, 2).is_empty());
}

#[test]
fn test_survey_file_missing_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SurveyFile::open(&dir.path().join("nope.bin")).is_err());
}
