pub mod transfer_copy;
pub mod transfer_download;
pub mod transfer_list;
pub mod transfer_upload;
pub mod whoami;

use crate::skp::{RecipientType, TransferLocation};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

#[derive(Debug)]
pub enum Action {
    Upload {
        files: Vec<PathBuf>,
        recipients: Vec<(RecipientType, String)>,
        subject: Option<String>,
        message: Option<String>,
        ttl: Option<u32>,
        password: Option<SecretString>,
    },
    ListTransfers {
        location: TransferLocation,
        search: Option<String>,
        unread: bool,
    },
    Download {
        dir: PathBuf,
        interval: Option<Duration>,
        include_old: bool,
        include_sent: bool,
        use_filename: bool,
    },
    Copy {
        folder: u64,
        interval: Option<Duration>,
    },
    WhoAmI,
}
