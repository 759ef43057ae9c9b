use crate::{
    auth::TokenClient,
    skp::{actions::Action, response_error, responses::AccessTokenResponse},
};
use anyhow::Result;
use reqwest::{Client, Method, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Exchanges the ID token for an SKP access token.
#[derive(Debug, Clone)]
pub struct SkpTokenClient {
    http: Client,
    endpoint: Url,
}

impl SkpTokenClient {
    #[must_use]
    pub const fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

impl Action for SkpTokenClient {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(vec!["auth", "access"])
    }
}

impl TokenClient for SkpTokenClient {
    async fn fetch_access_token(&self, id_token: &SecretString) -> Result<String> {
        let url = self.url(&self.endpoint)?;

        let response = self
            .http
            .request(self.http_method(), url)
            .header(AUTHORIZATION, format!("Bearer {}", id_token.expose_secret()))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json::<AccessTokenResponse>().await?.token)
        } else {
            Err(response_error(response).await.into())
        }
    }
}
