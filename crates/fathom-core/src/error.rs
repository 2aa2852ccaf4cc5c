use thiserror::Error;

#[derive(Error, Debug)]
pub enum FathomError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid metadata table: {0}")]
    InvalidMetadata(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Channel {0} not present in survey")]
    UnknownChannel(u32),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Empty row sequence")]
    EmptySequence,

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

pub type Result<T> = std::result::Result<T, FathomError>;

/// Reason a single metadata row was dropped.
///
/// Never escapes the record store: rows that fail to parse are counted and
/// skipped so that one corrupt line cannot abort a whole survey.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseSkip {
    #[error("malformed CSV row: {0}")]
    Malformed(String),

    #[error("field `{field}` is not numeric: {value:?}")]
    BadNumber { field: &'static str, value: String },
}
