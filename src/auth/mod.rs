//! Access tokens.
//!
//! The stored ID token is long lived, every service exchanges it for its own
//! short lived access token. A rejected access token (401) is dropped and
//! fetched again once.

use anyhow::{Context, Result, anyhow};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::future::{self, Future};
use tokio::sync::Mutex;

/// Anything that can exchange an ID token for an access token.
pub trait TokenClient: Send + Sync {
    fn fetch_access_token(
        &self,
        id_token: &SecretString,
    ) -> impl Future<Output = Result<String>> + Send;
}

pub struct AuthManager<T> {
    id_token: SecretString,
    client: T,
    access_token: Mutex<Option<SecretString>>,
}

impl<T: TokenClient> AuthManager<T> {
    #[must_use]
    pub fn new(id_token: SecretString, client: T) -> Self {
        Self {
            id_token,
            client,
            access_token: Mutex::new(None),
        }
    }

    /// Return the cached access token or fetch a new one.
    ///
    /// # Errors
    /// Will return an error if there is no ID token or the exchange fails
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.access_token.lock().await;

        if let Some(token) = cached.as_ref() {
            return Ok(token.expose_secret().to_string());
        }

        if self.id_token.expose_secret().is_empty() {
            return Err(anyhow!("no ID token available"));
        }

        log::debug!("fetching access token");

        let token = self
            .client
            .fetch_access_token(&self.id_token)
            .await
            .context("could not fetch access token")?;

        *cached = Some(SecretString::new(token.clone().into_boxed_str()));

        Ok(token)
    }

    pub async fn clear(&self) {
        *self.access_token.lock().await = None;
    }

    /// Send a request carrying an access token, `build` is called again with
    /// a fresh token if the server answers 401.
    ///
    /// # Errors
    /// Will return an error if no access token can be obtained or the request
    /// can not be sent
    pub async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&str) -> Result<RequestBuilder> + Send + Sync,
    {
        self.send_with(|token| future::ready(build(&token))).await
    }

    /// Like [`send`](Self::send) for requests whose body is built
    /// asynchronously, e.g. from a file.
    ///
    /// # Errors
    /// Will return an error if no access token can be obtained, the request
    /// can not be built or sent
    pub async fn send_with<F, Fut>(&self, build: F) -> Result<Response>
    where
        F: Fn(String) -> Fut + Send + Sync,
        Fut: Future<Output = Result<RequestBuilder>> + Send,
    {
        let token = self.access_token().await?;
        let response = build(token).await?.send().await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        log::info!("access token rejected, requesting a new one");

        self.clear().await;

        let token = self.access_token().await?;

        Ok(build(token).await?.send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    impl TokenClient for Counter {
        async fn fetch_access_token(&self, id_token: &SecretString) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{}-{n}", id_token.expose_secret()))
        }
    }

    struct Failing;

    impl TokenClient for Failing {
        async fn fetch_access_token(&self, _id_token: &SecretString) -> Result<String> {
            Err(anyhow!("boom"))
        }
    }

    #[tokio::test]
    async fn test_access_token_is_cached() {
        let auth = AuthManager::new(SecretString::new("id".into()), Counter::default());
        assert_eq!(auth.access_token().await.unwrap(), "id-0");
        assert_eq!(auth.access_token().await.unwrap(), "id-0");
        assert_eq!(auth.client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_refetches() {
        let auth = AuthManager::new(SecretString::new("id".into()), Counter::default());
        assert_eq!(auth.access_token().await.unwrap(), "id-0");
        auth.clear().await;
        assert_eq!(auth.access_token().await.unwrap(), "id-1");
    }

    #[tokio::test]
    async fn test_missing_id_token() {
        let auth = AuthManager::new(SecretString::new("".into()), Counter::default());
        assert!(auth.access_token().await.is_err());
        assert_eq!(auth.client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_error() {
        let auth = AuthManager::new(SecretString::new("id".into()), Failing);
        let err = auth.access_token().await.unwrap_err();
        assert!(format!("{err:#}").contains("boom"));
    }
}
