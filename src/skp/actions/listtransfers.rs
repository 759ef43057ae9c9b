use crate::skp::{
    Skp, Transfer, TransferLocation, actions::Action, response_error,
    responses::ListTransfersResponse,
};
use anyhow::Result;
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct ListTransfers {
    pub location: Option<TransferLocation>,
    pub search: Option<String>,
}

impl ListTransfers {
    #[must_use]
    pub const fn new(location: Option<TransferLocation>, search: Option<String>) -> Self {
        Self { location, search }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, skp: &Skp) -> Result<Vec<Transfer>> {
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
            let list = response.json::<ListTransfersResponse>().await?;

            log::debug!("transfers: {}", list.total);

            Ok(list.transfers)
        } else {
            Err(response_error(response).await.into())
        }
    }
}

impl Action for ListTransfers {
    fn http_method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(vec!["transfers"])
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();

        if let Some(location) = &self.location {
            map.insert("location", location.as_str());
        }

        if let Some(search) = &self.search {
            map.insert("search", search);
        }

        Some(map)
    }
}
