use crate::skp::{Skp, SkpEnvironment, actions::Action, response_error};
use anyhow::Result;
use reqwest::Method;

#[derive(Debug, Default)]
pub struct GetEnvironment;

impl GetEnvironment {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// No authentication needed.
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, skp: &Skp) -> Result<SkpEnvironment> {
        let url = self.url(skp.endpoint())?;
        let response = skp.http().request(self.http_method(), url).send().await?;

        if response.status().is_success() {
            Ok(response.json::<SkpEnvironment>().await?)
        } else {
            Err(response_error(response).await.into())
        }
    }
}

impl Action for GetEnvironment {
    fn http_method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(vec!["environment"])
    }
}
