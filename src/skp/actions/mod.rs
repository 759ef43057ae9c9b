//! Actions
//! one file per endpoint of `{host}/api/skp/v1`

use anyhow::{Result, anyhow};
use reqwest::Method;
use std::collections::BTreeMap;
use url::Url;

// GET /environment
mod getenvironment;
pub use self::getenvironment::GetEnvironment;

// POST /auth/access
mod accesstoken;
pub use self::accesstoken::SkpTokenClient;

// POST /reservations
mod createreservation;
pub use self::createreservation::{
    CreateReservation, RecipientType, ReservationRequest, ReservationRequestFile,
    TransferProtection, TransferReceiver,
};

// POST /reservations/{token}/confirm
mod confirmreservation;
pub use self::confirmreservation::ConfirmReservation;

// POST /upload
mod uploadchunk;
pub use self::uploadchunk::UploadChunk;

// HEAD /upload/{objectId}
mod headupload;
pub use self::headupload::HeadUpload;

// GET /transfers
mod listtransfers;
pub use self::listtransfers::ListTransfers;

// GET /transfers/{recipientId}
mod gettransfer;
pub use self::gettransfer::GetTransfer;

// POST /transfers/{recipientId}/copy
mod copytransfer;
pub use self::copytransfer::CopyTransfer;

// GET {file.url}
mod getfile;
pub use self::getfile::GetFile;

pub trait Action {
    // method to use GET/POST...
    fn http_method(&self) -> Method;

    // URL path, relative to the endpoint
    fn path(&self) -> Option<Vec<&str>>;

    // URL query pairs
    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    /// # Errors
    ///
    /// Will return `Err` if the endpoint can not be a base
    fn url(&self, endpoint: &Url) -> Result<Url> {
        let mut url = endpoint.clone();

        if let Some(path) = self.path() {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| anyhow!("cannot be base: {endpoint}"))?;

            segments.pop_if_empty();

            for p in path {
                segments.push(p);
            }
        }

        if let Some(pairs) = &self.query_pairs() {
            for (k, v) in pairs {
                url.query_pairs_mut().append_pair(k, v);
            }
        }

        Ok(url)
    }
}
