use crate::skp::{Skp, actions::Action, response_error};
use anyhow::{Context, Result};
use reqwest::{
    Method,
    header::{CONTENT_LENGTH, HeaderMap},
};

pub const SKP_AUTH_HEADER: &str = "X-Skp-Auth";

/// Ask how many bytes of an object the server holds.
#[derive(Debug)]
pub struct HeadUpload<'a> {
    object_id: &'a str,
    reservation_token: &'a str,
}

impl<'a> HeadUpload<'a> {
    #[must_use]
    pub const fn new(object_id: &'a str, reservation_token: &'a str) -> Self {
        Self {
            object_id,
            reservation_token,
        }
    }

    /// A missing `Content-Length` counts as 0.
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request, `ApiError::NotFound`
    /// if the server has nothing for the object
    pub async fn request(&self, skp: &Skp) -> Result<u64> {
        let url = self.url(skp.endpoint())?;

        let response = skp
            .send(|token| {
                Ok(skp
                    .http()
                    .request(self.http_method(), url.clone())
                    .bearer_auth(token)
                    .header(SKP_AUTH_HEADER, self.reservation_token))
            })
            .await?;

        if !response.status().is_success() {
            return Err(response_error(response).await.into());
        }

        content_length(response.headers())
    }
}

fn content_length(headers: &HeaderMap) -> Result<u64> {
    match headers.get(CONTENT_LENGTH) {
        Some(length) => length
            .to_str()?
            .parse::<u64>()
            .with_context(|| format!("invalid Content-Length: {length:?}")),
        None => Ok(0),
    }
}

impl Action for HeadUpload<'_> {
    fn http_method(&self) -> Method {
        Method::HEAD
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(vec!["upload", self.object_id])
    }
}
