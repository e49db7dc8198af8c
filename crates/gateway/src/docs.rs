//! Documents (`total`) REST endpoints.

use std::time::Duration;

use async_trait::async_trait;
use scanstock_core::{Doc, DocId, DocPatch};

use crate::error::GatewayError;

/// Remote documents service.
#[async_trait]
pub trait DocsGateway: Send + Sync {
    /// Rows of the document `id`.
    async fn get_docs_item(&self, base_url: &str, id: DocId) -> Result<Vec<Doc>, GatewayError>;

    /// Apply a partial update and return the stored document.
    async fn update_doc(&self, base_url: &str, patch: &DocPatch) -> Result<Doc, GatewayError>;
}

/// `GET/PUT {base_url}/total/{id}` over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpDocsGateway {
    client: reqwest::Client,
}

impl HttpDocsGateway {
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

pub(crate) fn total_url(base_url: &str, id: DocId) -> Result<reqwest::Url, GatewayError> {
    let url = format!("{}/total/{}", base_url.trim_end_matches('/'), id);
    reqwest::Url::parse(&url).map_err(|e| GatewayError::Endpoint(format!("{url}: {e}")))
}

async fn read_json<T>(resp: reqwest::Response) -> Result<T, GatewayError>
where
    T: serde::de::DeserializeOwned,
{
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GatewayError::Status(status.as_u16(), body));
    }
    resp.json().await.map_err(GatewayError::from_reqwest)
}

#[async_trait]
impl DocsGateway for HttpDocsGateway {
    async fn get_docs_item(&self, base_url: &str, id: DocId) -> Result<Vec<Doc>, GatewayError> {
        let url = total_url(base_url, id)?;
        tracing::debug!(%url, "fetching document");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;
        read_json(resp).await
    }

    async fn update_doc(&self, base_url: &str, patch: &DocPatch) -> Result<Doc, GatewayError> {
        let url = total_url(base_url, patch.id)?;
        tracing::debug!(%url, fields = patch.changes.len(), "updating document");
        let resp = self
            .client
            .put(url)
            .json(&patch.changes)
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;
        read_json(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_url_joins_without_double_slash() {
        let url = total_url("http://docs.local:8000/api/", DocId::new(12)).unwrap();
        assert_eq!(url.as_str(), "http://docs.local:8000/api/total/12");
    }

    #[test]
    fn total_url_rejects_relative_base() {
        assert!(matches!(
            total_url("docs", DocId::new(1)),
            Err(GatewayError::Endpoint(_))
        ));
    }
}
