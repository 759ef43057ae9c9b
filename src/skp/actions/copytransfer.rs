use crate::skp::{Skp, Transfer, actions::Action, response_error};
use anyhow::Result;
use reqwest::Method;
use serde_json::json;

/// Copy a received transfer into a drive folder.
#[derive(Debug)]
pub struct CopyTransfer<'a> {
    recipient_id: &'a str,
    folder_idx: u64,
}

impl<'a> CopyTransfer<'a> {
    #[must_use]
    pub const fn new(recipient_id: &'a str, folder_idx: u64) -> Self {
        Self {
            recipient_id,
            folder_idx,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, skp: &Skp) -> Result<Transfer> {
        let url = self.url(skp.endpoint())?;
        let body = json!({ "idx": self.folder_idx });

        let response = skp
            .send(|token| {
                Ok(skp
                    .http()
                    .request(self.http_method(), url.clone())
                    .bearer_auth(token)
                    .json(&body))
            })
            .await?;

        if response.status().is_success() {
            Ok(response.json::<Transfer>().await?)
        } else {
            Err(response_error(response).await.into())
        }
    }
}

impl Action for CopyTransfer<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(vec!["transfers", self.recipient_id, "copy"])
    }
}
