//! Element store backed by the REST API

use async_trait::async_trait;
use futures::future::try_join_all;
use mms_core::{CoreResult, ElementRecord, ElementStore, ReadContext};
use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::url::UrlBuilder;

#[derive(Deserialize)]
struct ElementsResponse {
    #[serde(default)]
    elements: Vec<ElementRecord>,
}

/// [`ElementStore`] that reads elements over HTTP.
///
/// Batched reads fan out into one request per id, all in flight at once,
/// and come back in request order.
pub struct HttpElementStore {
    client: Client,
    urls: UrlBuilder,
}

impl HttpElementStore {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::ClientBuild(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    /// Use a preconfigured reqwest client (proxies, custom TLS, ...)
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            urls: UrlBuilder::new(config),
        }
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    async fn fetch_element(&self, id: &str, ctx: &ReadContext) -> ClientResult<ElementRecord> {
        let url = self.urls.element_url(id, ctx, false);
        tracing::debug!(%url, "fetching element");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %url, "element request failed");
            return Err(ClientError::from_status(status.as_u16(), &body, url));
        }

        let payload: ElementsResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        payload
            .elements
            .into_iter()
            .next()
            .ok_or(ClientError::Empty(url))
    }
}

#[async_trait]
impl ElementStore for HttpElementStore {
    async fn get_element(&self, id: &str, ctx: &ReadContext) -> CoreResult<ElementRecord> {
        Ok(self.fetch_element(id, ctx).await?)
    }

    async fn get_elements(
        &self,
        ids: &[String],
        ctx: &ReadContext,
    ) -> CoreResult<Vec<ElementRecord>> {
        tracing::debug!(count = ids.len(), %ctx, "fetching element batch");
        let records = try_join_all(ids.iter().map(|id| self.fetch_element(id, ctx))).await?;
        Ok(records)
    }

    fn store_name(&self) -> &str {
        self.urls.root()
    }
}
