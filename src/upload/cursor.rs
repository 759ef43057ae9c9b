use crate::{skp::ReservationResponseFile, upload::chunk::Chunk};
use std::path::Path;

/// States of the per-file upload loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// asking the server how many bytes it already has
    Probing,
    /// a chunk is in flight
    Sending,
    /// waiting before the next attempt
    Retrying,
    Done,
}

/// Upload position of one file, `start` is what the server confirmed,
/// `end` bounds the chunk in flight.
#[derive(Debug)]
pub struct UploadCursor<'a> {
    pub path: &'a Path,
    pub file: &'a ReservationResponseFile,
    pub start: u64,
    pub end: u64,
    pub retries: u32,
    pub should_probe: bool,
}

impl<'a> UploadCursor<'a> {
    /// A new file never probes, nothing can have been received yet.
    #[must_use]
    pub const fn new(path: &'a Path, file: &'a ReservationResponseFile) -> Self {
        Self {
            path,
            file,
            start: 0,
            end: 0,
            retries: 0,
            should_probe: false,
        }
    }

    #[must_use]
    pub const fn entry_state(&self) -> FileState {
        if self.should_probe {
            FileState::Probing
        } else {
            FileState::Sending
        }
    }

    /// Set `end` to `min(start + chunk_size, size)` and describe the range.
    pub fn next_chunk<'b>(&mut self, token: &'b str, chunk_size: u64) -> Chunk<'b>
    where
        'a: 'b,
    {
        let file = self.file;

        self.start = self.start.min(file.size);
        self.end = self.start.saturating_add(chunk_size).min(file.size);

        Chunk {
            object_id: &file.object_id,
            token,
            file: self.path,
            file_name: &file.name,
            start: self.start,
            end: self.end,
            total: file.size,
        }
    }

    /// Forget the local position, the next attempt re-synchronizes with the server.
    pub const fn rewind(&mut self) {
        self.start = 0;
        self.end = 0;
        self.should_probe = true;
    }
}
