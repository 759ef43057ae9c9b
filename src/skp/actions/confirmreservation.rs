use crate::skp::{ReservationConfirmResult, Skp, actions::Action, response_error};
use anyhow::Result;
use reqwest::Method;

#[derive(Debug)]
pub struct ConfirmReservation<'a> {
    token: &'a str,
}

impl<'a> ConfirmReservation<'a> {
    #[must_use]
    pub const fn new(token: &'a str) -> Self {
        Self { token }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, skp: &Skp) -> Result<ReservationConfirmResult> {
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
            Ok(response.json::<ReservationConfirmResult>().await?)
        } else {
            Err(response_error(response).await.into())
        }
    }
}

impl Action for ConfirmReservation<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(vec!["reservations", self.token, "confirm"])
    }
}
