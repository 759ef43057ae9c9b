use anyhow::{Context, Result};
use bytes::Bytes;
use futures::stream::TryStreamExt;
use reqwest::{
    Body,
    multipart::{Form, Part},
};
use std::{io::SeekFrom, path::Path, sync::Arc};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt},
};
use tokio_util::codec::{BytesCodec, FramedRead};

// read the file in 256KB frames, every frame is a progress tick
const READ_CAPACITY: usize = 1_024 * 256;

/// Called with the number of bytes of the current chunk sent so far.
pub type ChunkProgress = Arc<dyn Fn(u64) + Send + Sync>;

/// One contiguous byte range `[start, end)` of a reserved file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub object_id: &'a str,
    pub token: &'a str,
    pub file: &'a Path,
    pub file_name: &'a str,
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl Chunk<'_> {
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `bytes {start}-{end - 1}/{total}`, `None` for an empty range.
    #[must_use]
    pub fn content_range(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(format!(
                "bytes {}-{}/{}",
                self.start,
                self.end - 1,
                self.total
            ))
        }
    }

    /// Build the multipart body: `objectId`, `authToken` and the file slice
    /// as part `f`. The file is opened here and closed once the body has been
    /// sent.
    ///
    /// # Errors
    /// Will return an error if the file can not be opened or seeked
    pub async fn form(&self, progress: ChunkProgress) -> Result<Form> {
        let mut file = File::open(self.file)
            .await
            .with_context(|| format!("could not open {}", self.file.display()))?;

        file.seek(SeekFrom::Start(self.start)).await?;

        let length = self.len();
        let mut sent: u64 = 0;

        let stream = FramedRead::with_capacity(file.take(length), BytesCodec::new(), READ_CAPACITY)
            .map_ok(move |bytes| {
                sent += bytes.len() as u64;
                progress(sent);
                Bytes::from(bytes)
            });

        let part = Part::stream_with_length(Body::wrap_stream(stream), length)
            .file_name(self.file_name.to_string());

        Ok(Form::new()
            .text("objectId", self.object_id.to_string())
            .text("authToken", self.token.to_string())
            .part("f", part))
    }
}
