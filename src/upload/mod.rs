//! Resumable chunked uploads.
//!
//! Files are sent one after the other, each one as a sequence of byte ranges.
//! After a failure the local position is discarded and the server is asked
//! how many bytes it already received before continuing.

pub mod chunk;
pub mod chunk_size;
pub mod cursor;
pub mod progress;
pub mod retry;

pub use self::{
    chunk::{Chunk, ChunkProgress},
    chunk_size::{ChunkSizer, INITIAL_CHUNK_SIZE},
    cursor::{FileState, UploadCursor},
    progress::{Progress, UploadObserver},
    retry::RetryPolicy,
};

use crate::skp::{
    ReservationConfirmResult, ReservationRequest, ReservationResponse, UploadInfo, is_not_found,
};
use anyhow::{Context, Result, anyhow};
use std::{future::Future, path::PathBuf, sync::Arc, time::Duration};
use tokio::time::{Instant, sleep};

// give the server a moment to finalize the transfer after confirming it
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// The remote side of an upload.
pub trait ObjectStore: Send + Sync {
    fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> impl Future<Output = Result<ReservationResponse>> + Send;

    fn confirm_reservation(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<ReservationConfirmResult>> + Send;

    /// Send one byte range, returns the number of bytes the server now holds
    /// for the object.
    fn upload_chunk(
        &self,
        chunk: &Chunk<'_>,
        progress: ChunkProgress,
    ) -> impl Future<Output = Result<UploadInfo>> + Send;

    /// Number of bytes received so far. Must fail with
    /// [`ApiError::NotFound`](crate::skp::ApiError::NotFound) when the server
    /// has no data for the object yet.
    fn fetch_uploaded_size(
        &self,
        object_id: &str,
        token: &str,
    ) -> impl Future<Output = Result<u64>> + Send;
}

pub struct TransferUploader<'a, S> {
    store: &'a S,
    chunk_sizer: ChunkSizer,
    initial_chunk_size: u64,
    retry: RetryPolicy,
    settle: Duration,
}

impl<'a, S: ObjectStore> TransferUploader<'a, S> {
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            chunk_sizer: ChunkSizer::default(),
            initial_chunk_size: INITIAL_CHUNK_SIZE,
            retry: RetryPolicy::default(),
            settle: SETTLE_DELAY,
        }
    }

    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn with_chunk_sizer(mut self, chunk_sizer: ChunkSizer) -> Self {
        self.chunk_sizer = chunk_sizer;
        self
    }

    #[must_use]
    pub const fn with_initial_chunk_size(mut self, size: u64) -> Self {
        self.initial_chunk_size = size;
        self
    }

    #[must_use]
    pub const fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Reserve, upload every file and confirm the transfer.
    ///
    /// `paths[i]` is uploaded as the reserved file with id `"i"`, the declared
    /// sizes in `request` must match the files on disk.
    ///
    /// # Errors
    /// Will return an error if the reservation can not be created or
    /// confirmed, or if a file fails after exhausting the retries. The
    /// reservation is left unconfirmed in that case.
    pub async fn upload_transfer(
        &self,
        paths: &[PathBuf],
        request: &ReservationRequest,
        observer: Arc<dyn UploadObserver>,
    ) -> Result<ReservationConfirmResult> {
        if paths.len() != request.files.len() {
            return Err(anyhow!(
                "got {} paths for {} reserved files",
                paths.len(),
                request.files.len()
            ));
        }

        let total: u64 = request.files.iter().map(|f| f.size).sum();

        let progress = Arc::new(Progress::new(total, observer));
        progress.start();

        let reservation = self
            .store
            .create_reservation(request)
            .await
            .context("could not create reservation")?;

        progress.observer().reservation_created(&reservation);

        log::info!(
            "reservation created, files: {}, total size: {}",
            reservation.files.len(),
            reservation.total_size
        );

        let mut cursors = paths
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let id = i.to_string();
                reservation
                    .files
                    .iter()
                    .find(|f| f.id == id)
                    .map(|file| UploadCursor::new(path, file))
                    .with_context(|| format!("reservation has no file with id {id}"))
            })
            .collect::<Result<Vec<_>>>()?;

        // shared by all the files of this transfer
        let mut chunk_size = self.initial_chunk_size;
        let mut completed: u64 = 0;

        for cursor in &mut cursors {
            let file = cursor.file;

            self.upload_file(
                cursor,
                &reservation.token,
                &mut chunk_size,
                completed,
                &progress,
            )
            .await
            .with_context(|| {
                format!(
                    "could not upload {} (object id: {})",
                    file.name, file.object_id
                )
            })?;

            completed += file.size;

            log::info!("uploaded {} ({} bytes)", file.name, file.size);
        }

        progress.observer().reservation_confirm();

        let result = self
            .store
            .confirm_reservation(&reservation.token)
            .await
            .context("could not confirm reservation")?;

        if !self.settle.is_zero() {
            sleep(self.settle).await;
        }

        Ok(result)
    }

    async fn upload_file(
        &self,
        cursor: &mut UploadCursor<'_>,
        token: &str,
        chunk_size: &mut u64,
        completed: u64,
        progress: &Arc<Progress>,
    ) -> Result<()> {
        let mut state = cursor.entry_state();

        loop {
            log::debug!(
                "{}: {:?}, start: {}, retries: {}",
                cursor.file.object_id,
                state,
                cursor.start,
                cursor.retries
            );

            state = match state {
                FileState::Probing => self.probe(cursor, token).await?,
                FileState::Sending => {
                    self.send(cursor, token, chunk_size, completed, progress)
                        .await?
                }
                FileState::Retrying => {
                    self.backoff(cursor).await;
                    cursor.entry_state()
                }
                FileState::Done => {
                    progress.update(completed + cursor.file.size);
                    return Ok(());
                }
            };
        }
    }

    async fn probe(&self, cursor: &mut UploadCursor<'_>, token: &str) -> Result<FileState> {
        match self
            .store
            .fetch_uploaded_size(&cursor.file.object_id, token)
            .await
        {
            Ok(received) => {
                cursor.should_probe = false;

                log::info!(
                    "{}: server has {received} of {} bytes",
                    cursor.file.object_id,
                    cursor.file.size
                );

                if received >= cursor.file.size {
                    return Ok(FileState::Done);
                }

                cursor.start = received;

                Ok(FileState::Sending)
            }

            // nothing has reached the server yet
            Err(err) if is_not_found(&err) => {
                cursor.should_probe = false;
                cursor.start = 0;

                Ok(FileState::Sending)
            }

            Err(err) => self.failed(cursor, err),
        }
    }

    async fn send(
        &self,
        cursor: &mut UploadCursor<'_>,
        token: &str,
        chunk_size: &mut u64,
        completed: u64,
        progress: &Arc<Progress>,
    ) -> Result<FileState> {
        let chunk = cursor.next_chunk(token, *chunk_size);

        let base = completed + chunk.start;
        let tracker = Arc::clone(progress);
        let on_progress: ChunkProgress = Arc::new(move |sent| tracker.update(base + sent));

        log::debug!(
            "{}: sending bytes {}..{} of {}",
            chunk.object_id,
            chunk.start,
            chunk.end,
            chunk.total
        );

        let started = Instant::now();

        match self.store.upload_chunk(&chunk, on_progress).await {
            // an unchanged size would resend the same range forever, a lower one is accepted
            Ok(info) if info.size == chunk.start && !chunk.is_empty() => {
                self.failed(
                    cursor,
                    anyhow!(
                        "server acknowledged no new bytes for range {}..{}, has {}",
                        chunk.start,
                        chunk.end,
                        info.size
                    ),
                )
            }

            Ok(info) => {
                let elapsed = started.elapsed();

                cursor.retries = 0;
                *chunk_size = self.chunk_sizer.next(elapsed, *chunk_size);

                log::info!(
                    "{}: {} of {} bytes received, took {:.1}s, next chunk size: {}",
                    chunk.object_id,
                    info.size,
                    chunk.total,
                    elapsed.as_secs_f64(),
                    chunk_size
                );

                if info.size >= chunk.total {
                    Ok(FileState::Done)
                } else {
                    cursor.start = info.size;
                    cursor.should_probe = false;
                    Ok(FileState::Sending)
                }
            }

            Err(err) => self.failed(cursor, err),
        }
    }

    fn failed(&self, cursor: &UploadCursor<'_>, err: anyhow::Error) -> Result<FileState> {
        if self.retry.should_retry(cursor.retries) {
            log::warn!(
                "{}: attempt {}/{} failed: {err:#}",
                cursor.file.object_id,
                cursor.retries + 1,
                self.retry.max_retries + 1
            );

            Ok(FileState::Retrying)
        } else {
            Err(err)
        }
    }

    async fn backoff(&self, cursor: &mut UploadCursor<'_>) {
        cursor.retries += 1;

        let wait = self.retry.backoff(cursor.retries);

        log::warn!(
            "{}: retry {}/{} in {} seconds",
            cursor.file.object_id,
            cursor.retries,
            self.retry.max_retries,
            wait.as_secs()
        );

        sleep(wait).await;

        cursor.rewind();
    }
}
