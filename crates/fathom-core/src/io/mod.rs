pub mod image_io;
pub mod metadata;
pub mod payload;

pub use metadata::{read_records, read_records_from_reader, RecordSet};
pub use payload::{read_payload, SurveyFile};
