pub mod actions;
pub mod responses;

pub use self::{
    actions::{
        RecipientType, ReservationRequest, ReservationRequestFile, SkpTokenClient,
        TransferProtection, TransferReceiver,
    },
    responses::{
        ConfirmedTransfer, Expiration, ReservationConfirmResult, ReservationResponse,
        ReservationResponseFile, SkpEnvironment, Transfer, TransferFile, TransferLocation,
        UploadInfo,
    },
};

use crate::{
    auth::AuthManager,
    upload::{Chunk, ChunkProgress, ObjectStore},
};
use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::SecretString;
use std::{fmt, future::Future};
use url::Url;

pub const BASE_PATH: &str = "/api/skp/v1";

/// An unsuccessful HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("HTTP Status Code: {status}, {message}")]
    Status { status: StatusCode, message: String },
}

/// True if `err` or any of its causes is [`ApiError::NotFound`].
#[must_use]
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|e| matches!(e.downcast_ref::<ApiError>(), Some(ApiError::NotFound { .. })))
}

/// Turn a non-success response into an [`ApiError`], using the server's
/// error message when the body has one.
pub async fn response_error(response: Response) -> ApiError {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound {
            url: response.url().to_string(),
        };
    }

    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.pointer("/error/message")
                .or_else(|| json.pointer("/message"))
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or(body);

    ApiError::Status { status, message }
}

/// Append `path` to the path of `url`, `https://host` + `/api/skp/v1`.
///
/// # Errors
/// Will return an error if the url can not be a base
pub fn join_path(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();

    url.path_segments_mut()
        .map_err(|()| anyhow!("cannot be base: {base}"))?
        .pop_if_empty()
        .extend(path.split('/').filter(|p| !p.is_empty()));

    Ok(url)
}

/// Client of the SKP (TeamBeam transfer) server.
pub struct Skp {
    host: Url,
    endpoint: Url,
    http: Client,
    auth: AuthManager<SkpTokenClient>,
}

impl fmt::Display for Skp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host: {}\nendpoint: {}", self.host, self.endpoint)
    }
}

impl Skp {
    /// # Errors
    /// Will return an error if the host is not a valid URL
    pub fn new(host: &str, id_token: SecretString) -> Result<Self> {
        let host = Url::parse(host).with_context(|| format!("invalid host: {host}"))?;
        let endpoint = join_path(&host, BASE_PATH)?;

        let http = Client::builder()
            .user_agent(concat!("teambeam/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let auth = AuthManager::new(
            id_token,
            SkpTokenClient::new(http.clone(), endpoint.clone()),
        );

        Ok(Self {
            host,
            endpoint,
            http,
            auth,
        })
    }

    #[must_use]
    pub const fn host(&self) -> &Url {
        &self.host
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub const fn http(&self) -> &Client {
        &self.http
    }

    /// Send a request authenticated with the SKP access token.
    ///
    /// # Errors
    /// Will return an error if no access token can be obtained or the request
    /// can not be sent
    pub async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&str) -> Result<RequestBuilder> + Send + Sync,
    {
        self.auth.send(build).await
    }

    /// Send a request whose body is built asynchronously, the builder runs
    /// again if the access token has to be replaced.
    ///
    /// # Errors
    /// Will return an error if no access token can be obtained or the request
    /// can not be built or sent
    pub async fn send_with<F, Fut>(&self, build: F) -> Result<Response>
    where
        F: Fn(String) -> Fut + Send + Sync,
        Fut: Future<Output = Result<RequestBuilder>> + Send,
    {
        self.auth.send_with(build).await
    }
}

impl ObjectStore for Skp {
    async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationResponse> {
        actions::CreateReservation::new(request).request(self).await
    }

    async fn confirm_reservation(&self, token: &str) -> Result<ReservationConfirmResult> {
        actions::ConfirmReservation::new(token).request(self).await
    }

    async fn upload_chunk(&self, chunk: &Chunk<'_>, progress: ChunkProgress) -> Result<UploadInfo> {
        actions::UploadChunk::new(chunk, progress).request(self).await
    }

    async fn fetch_uploaded_size(&self, object_id: &str, token: &str) -> Result<u64> {
        actions::HeadUpload::new(object_id, token).request(self).await
    }
}
