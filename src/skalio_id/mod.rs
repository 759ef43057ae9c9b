//! Skalio ID, the identity service next to SKP on the same host.

use crate::{
    auth::{AuthManager, TokenClient},
    skp::{join_path, response_error},
};
use anyhow::{Context, Result};
use reqwest::{Client, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

pub const BASE_PATH: &str = "/api/id/v3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailAddress {
    pub address: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
struct EmailsResponse {
    emails: Vec<EmailAddress>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Exchanges the ID token for a Skalio ID access token.
#[derive(Debug, Clone)]
pub struct SkalioIdTokenClient {
    http: Client,
    endpoint: Url,
}

impl SkalioIdTokenClient {
    #[must_use]
    pub const fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

impl TokenClient for SkalioIdTokenClient {
    async fn fetch_access_token(&self, id_token: &SecretString) -> Result<String> {
        let url = join_path(&self.endpoint, "auth/access")?;

        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", id_token.expose_secret()))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json::<TokenResponse>().await?.token)
        } else {
            Err(response_error(response).await.into())
        }
    }
}

pub struct SkalioId {
    endpoint: Url,
    http: Client,
    auth: AuthManager<SkalioIdTokenClient>,
}

impl SkalioId {
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
            SkalioIdTokenClient::new(http.clone(), endpoint.clone()),
        );

        Ok(Self {
            endpoint,
            http,
            auth,
        })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// E-mail addresses of the account owning the ID token.
    ///
    /// # Errors
    /// Will return an error if the request fails
    pub async fn fetch_emails(&self) -> Result<Vec<EmailAddress>> {
        let url = join_path(&self.endpoint, "profile/emails")?;

        let response = self
            .auth
            .send(|token| Ok(self.http.get(url.clone()).bearer_auth(token)))
            .await?;

        if response.status().is_success() {
            Ok(response.json::<EmailsResponse>().await?.emails)
        } else {
            Err(response_error(response).await.into())
        }
    }
}
