use crate::skp::{Skp, Transfer, actions::Action, response_error};
use anyhow::Result;
use reqwest::Method;

#[derive(Debug)]
pub struct GetTransfer<'a> {
    recipient_id: &'a str,
}

impl<'a> GetTransfer<'a> {
    #[must_use]
    pub const fn new(recipient_id: &'a str) -> Self {
        Self { recipient_id }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, skp: &Skp) -> Result<Transfer> {
        let url = self.url(skp.endpoint())?;

        let response = skp
            .send(|token| {
                Ok(skp
                    .http()
                    .request(self.http_method(), url.clone())
                    .bearer_auth(token))
            })
            .await?;

        if response.status().is_success() {
            Ok(response.json::<Transfer>().await?)
        } else {
            Err(response_error(response).await.into())
        }
    }
}

impl Action for GetTransfer<'_> {
    fn http_method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(vec!["transfers", self.recipient_id])
    }
}
