use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::Result;
use crate::record::Record;

/// Read `size` bytes at `offset` from the survey file.
///
/// Any failure (missing file, offset past the end, short read) yields an
/// empty vector; callers render that as a zero row.
pub fn read_payload(path: &Path, offset: u64, size: u64) -> Vec<u8> {
    try_read(path, offset, size).unwrap_or_default()
}

fn try_read(path: &Path, offset: u64, size: u64) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    // Sizes come from the metadata table; check them before allocating.
    let end = offset.checked_add(size).ok_or(ErrorKind::InvalidInput)?;
    if end > file.metadata()?.len() {
        return Err(ErrorKind::UnexpectedEof.into());
    }
    let len = usize::try_from(size).map_err(|_| ErrorKind::InvalidInput)?;

    file.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::with_capacity(len);
    file.take(size).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(ErrorKind::UnexpectedEof.into());
    }
    Ok(buf)
}

/// Memory-mapped binary survey file.
///
/// Ranges are validated at access time; anything outside the file reads as
/// an empty slice.
pub struct SurveyFile {
    path: PathBuf,
    mmap: Mmap,
}

impl SurveyFile {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // The mapping is read-only and the survey is not modified while open.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Bytes in `[offset, offset + size)`, or an empty slice if out of range.
    pub fn slice(&self, offset: u64, size: u64) -> &[u8] {
        let Some(end) = offset.checked_add(size) else {
            return &[];
        };
        if end > self.len() {
            return &[];
        }
        &self.mmap[offset as usize..end as usize]
    }

    /// Raw intensity samples for one record.
    pub fn payload(&self, record: &Record) -> &[u8] {
        match record.payload_range() {
            Some((offset, size)) => self.slice(offset, size),
            None => &[],
        }
    }
}
