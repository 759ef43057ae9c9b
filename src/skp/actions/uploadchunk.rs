use crate::{
    skp::{Skp, UploadInfo, actions::Action, response_error},
    upload::{Chunk, ChunkProgress},
};
use anyhow::Result;
use reqwest::{Method, header::CONTENT_RANGE};
use std::sync::Arc;

pub struct UploadChunk<'a> {
    chunk: &'a Chunk<'a>,
    progress: ChunkProgress,
}

impl<'a> UploadChunk<'a> {
    #[must_use]
    pub fn new(chunk: &'a Chunk<'a>, progress: ChunkProgress) -> Self {
        Self { chunk, progress }
    }

    /// The body is rebuilt, and the file reopened, if the request has to be
    /// replayed with a new access token.
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, skp: &Skp) -> Result<UploadInfo> {
        let url = self.url(skp.endpoint())?;
        let content_range = self.chunk.content_range();

        let url = &url;
        let content_range = content_range.as_deref();

        let response = skp
            .send_with(move |token| async move {
                let form = self.chunk.form(Arc::clone(&self.progress)).await?;

                let mut request = skp
                    .http()
                    .request(self.http_method(), url.clone())
                    .bearer_auth(token)
                    .multipart(form);

                if let Some(range) = content_range {
                    request = request.header(CONTENT_RANGE, range);
                }

                Ok(request)
            })
            .await?;

        if response.status().is_success() {
            Ok(response.json::<UploadInfo>().await?)
        } else {
            Err(response_error(response).await.into())
        }
    }
}

impl Action for UploadChunk<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(vec!["upload"])
    }
}
