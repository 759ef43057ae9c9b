use crate::skp::{Skp, TransferFile, actions::Action, response_error};
use anyhow::{Context, Result};
use reqwest::{Method, Response};
use url::Url;

/// Download a transfer file, the URL in the transfer is absolute and needs
/// no authentication.
#[derive(Debug)]
pub struct GetFile<'a> {
    file: &'a TransferFile,
}

impl<'a> GetFile<'a> {
    #[must_use]
    pub const fn new(file: &'a TransferFile) -> Self {
        Self { file }
    }

    /// Returns the response so the caller can stream the body.
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, skp: &Skp) -> Result<Response> {
        let url = Url::parse(&self.file.url)
            .with_context(|| format!("invalid file url: {}", self.file.url))?;

        let response = skp.http().request(self.http_method(), url).send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(response_error(response).await.into())
        }
    }
}

impl Action for GetFile<'_> {
    fn http_method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> Option<Vec<&str>> {
        None
    }
}
