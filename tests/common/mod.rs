//! Common test helpers for the upload integration tests
//!
//! - `FakeStore`: in-memory `ObjectStore` that records every call and can be
//!   told to fail sends or size queries, or to acknowledge less than was sent
//! - `Recorder`: `UploadObserver` that keeps the lifecycle hooks in order
//! - File helpers: sparse files of a given size and the matching request

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc
)]

use anyhow::{Result, anyhow};
use std::{
    collections::{HashMap, VecDeque},
    fs::File,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    time::Duration,
};
use teambeam::{
    skp::{
        ApiError, ConfirmedTransfer, RecipientType, ReservationConfirmResult, ReservationRequest,
        ReservationRequestFile, ReservationResponse, ReservationResponseFile, TransferReceiver,
        UploadInfo,
    },
    upload::{Chunk, ChunkProgress, ObjectStore, UploadObserver},
};
use tokio::time::sleep;

pub const TOKEN: &str = "res-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Reserve,
    Send {
        object_id: String,
        start: u64,
        end: u64,
        content_range: Option<String>,
    },
    SizeQuery {
        object_id: String,
    },
    Confirm {
        token: String,
    },
}

impl Event {
    pub fn send(object_id: &str, start: u64, end: u64) -> Self {
        Self::Send {
            object_id: object_id.to_string(),
            start,
            end,
            content_range: None,
        }
    }

    pub fn size_query(object_id: &str) -> Self {
        Self::SizeQuery {
            object_id: object_id.to_string(),
        }
    }

    pub fn confirm() -> Self {
        Self::Confirm {
            token: TOKEN.to_string(),
        }
    }

    // compare sends by range only
    fn without_content_range(&self) -> Self {
        match self {
            Self::Send {
                object_id,
                start,
                end,
                ..
            } => Self::send(object_id, *start, *end),
            event => event.clone(),
        }
    }
}

/// Scripted result of one send, an empty script passes.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    // the server keeps `keep` bytes of the chunk
    Fail { keep: u64 },
    Pass,
}

#[derive(Debug, Default)]
struct State {
    events: Vec<Event>,
    received: HashMap<String, u64>,
    outcomes: VecDeque<Outcome>,
    // chunk start -> size reported by the next passing send of that chunk
    acks: HashMap<u64, u64>,
    query_failures: usize,
}

/// Every chunk takes `chunk_duration` on the (paused) tokio clock.
#[derive(Debug)]
pub struct FakeStore {
    chunk_duration: Duration,
    state: Mutex<State>,
}

impl FakeStore {
    pub fn new(chunk_duration: Duration) -> Self {
        Self {
            chunk_duration,
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// The next send fails after the server stored `keep` bytes of it.
    pub fn fail_send(&self, keep: u64) {
        self.state().outcomes.push_back(Outcome::Fail { keep });
    }

    pub fn fail_sends(&self, count: usize) {
        self.state()
            .outcomes
            .extend(std::iter::repeat_n(Outcome::Fail { keep: 0 }, count));
    }

    /// The next send passes, used to place a success between failures.
    pub fn pass_send(&self) {
        self.state().outcomes.push_back(Outcome::Pass);
    }

    /// A passing send of the chunk starting at `start` reports `size`
    /// instead of its end.
    pub fn ack_at(&self, start: u64, size: u64) {
        self.state().acks.insert(start, size);
    }

    pub fn fail_size_queries(&self, count: usize) {
        self.state().query_failures += count;
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    /// Events with the `Content-Range` of the sends dropped.
    pub fn calls(&self) -> Vec<Event> {
        self.state()
            .events
            .iter()
            .map(Event::without_content_range)
            .collect()
    }

    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.state().events.iter().filter(|e| f(e)).count()
    }
}

impl ObjectStore for FakeStore {
    async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationResponse> {
        self.state().events.push(Event::Reserve);

        Ok(ReservationResponse {
            token: TOKEN.to_string(),
            files: request
                .files
                .iter()
                .map(|f| ReservationResponseFile {
                    id: f.id.clone(),
                    object_id: format!("obj-{}", f.id),
                    name: f.name.clone(),
                    size: f.size,
                })
                .collect(),
            total_size: request.files.iter().map(|f| f.size).sum(),
        })
    }

    async fn confirm_reservation(&self, token: &str) -> Result<ReservationConfirmResult> {
        self.state().events.push(Event::Confirm {
            token: token.to_string(),
        });

        Ok(ReservationConfirmResult {
            result: vec![ConfirmedTransfer {
                recipient_id: "rcpt-1".to_string(),
            }],
        })
    }

    async fn upload_chunk(
        &self,
        chunk: &Chunk<'_>,
        progress: ChunkProgress,
    ) -> Result<UploadInfo> {
        let outcome = {
            let mut state = self.state();
            state.events.push(Event::Send {
                object_id: chunk.object_id.to_string(),
                start: chunk.start,
                end: chunk.end,
                content_range: chunk.content_range(),
            });
            state.outcomes.pop_front().unwrap_or(Outcome::Pass)
        };

        sleep(self.chunk_duration).await;

        progress(chunk.len() / 2);

        if let Outcome::Fail { keep } = outcome {
            if keep > 0 {
                self.state()
                    .received
                    .insert(chunk.object_id.to_string(), chunk.start + keep);
            }
            return Err(anyhow!("connection reset"));
        }

        progress(chunk.len());

        let size = {
            let mut state = self.state();
            let size = state.acks.remove(&chunk.start).unwrap_or(chunk.end);
            state.received.insert(chunk.object_id.to_string(), size);
            size
        };

        Ok(UploadInfo {
            size,
            chunk_start: Some(chunk.start),
            chunk_end: Some(chunk.end.saturating_sub(1)),
            total_size: Some(chunk.total),
        })
    }

    async fn fetch_uploaded_size(&self, object_id: &str, token: &str) -> Result<u64> {
        let mut state = self.state();

        state.events.push(Event::size_query(object_id));

        if token != TOKEN {
            return Err(anyhow!("invalid reservation token"));
        }

        if state.query_failures > 0 {
            state.query_failures -= 1;
            return Err(anyhow!("gateway timeout"));
        }

        match state.received.get(object_id) {
            Some(size) => Ok(*size),
            None => Err(ApiError::NotFound {
                url: format!("fake://upload/{object_id}"),
            }
            .into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hook {
    Progress(u8),
    Created(usize),
    Confirm,
}

#[derive(Debug, Default)]
pub struct Recorder {
    hooks: Mutex<Vec<Hook>>,
}

impl Recorder {
    pub fn hooks(&self) -> Vec<Hook> {
        self.hooks.lock().unwrap().clone()
    }

    pub fn percents(&self) -> Vec<u8> {
        self.hooks()
            .into_iter()
            .filter_map(|h| match h {
                Hook::Progress(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl UploadObserver for Recorder {
    fn progress(&self, percent: u8) {
        self.hooks.lock().unwrap().push(Hook::Progress(percent));
    }

    fn reservation_created(&self, reservation: &ReservationResponse) {
        self.hooks
            .lock()
            .unwrap()
            .push(Hook::Created(reservation.files.len()));
    }

    fn reservation_confirm(&self) {
        self.hooks.lock().unwrap().push(Hook::Confirm);
    }
}

/// Create `name` in `dir` with `size` bytes without writing them.
pub fn sparse_file(dir: &Path, name: &str, size: u64) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("Failed to create file");
    file.set_len(size).expect("Failed to set file length");
    path
}

/// Request for `paths` with ids "0", "1", ... and one recipient.
pub fn request_for(paths: &[PathBuf]) -> ReservationRequest {
    ReservationRequest {
        subject: Some("test".to_string()),
        receivers: vec![TransferReceiver::new("to@example.com", RecipientType::To)],
        files: paths
            .iter()
            .enumerate()
            .map(|(i, path)| ReservationRequestFile {
                name: path.file_name().unwrap().to_string_lossy().to_string(),
                size: path.metadata().unwrap().len(),
                id: i.to_string(),
            })
            .collect(),
        ..Default::default()
    }
}
