use crate::skp::{ReservationResponse, Skp, actions::Action, response_error};
use anyhow::Result;
use reqwest::Method;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub receivers: Vec<TransferReceiver>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection: Option<TransferProtection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_notification: Option<bool>,
    pub files: Vec<ReservationRequestFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationRequestFile {
    pub name: String,
    pub size: u64,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    To,
    Cc,
    Bcc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceiver {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: RecipientType,
}

impl TransferReceiver {
    #[must_use]
    pub fn new(email: &str, kind: RecipientType) -> Self {
        Self {
            name: None,
            email: email.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferProtection {
    pub enabled: bool,
    pub key: String,
}

#[derive(Debug)]
pub struct CreateReservation<'a> {
    request: &'a ReservationRequest,
}

impl<'a> CreateReservation<'a> {
    #[must_use]
    pub const fn new(request: &'a ReservationRequest) -> Self {
        Self { request }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, skp: &Skp) -> Result<ReservationResponse> {
        let url = self.url(skp.endpoint())?;

        let response = skp
            .send(|token| {
                Ok(skp
                    .http()
                    .request(self.http_method(), url.clone())
                    .bearer_auth(token)
                    .json(self.request))
            })
            .await?;

        if response.status().is_success() {
            Ok(response.json::<ReservationResponse>().await?)
        } else {
            Err(response_error(response).await.into())
        }
    }
}

impl Action for CreateReservation<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(vec!["reservations"])
    }
}
