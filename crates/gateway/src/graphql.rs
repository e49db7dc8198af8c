//! GraphQL-over-HTTP cartridge gateway.

use std::time::Duration;

use async_trait::async_trait;
use scanstock_core::Cartridge;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cartridge::{CartridgeGateway, LookupVars, UpdateAmountVars};
use crate::error::GatewayError;

const CARTRIDGE_FIELDS: &str = "id name amount info logs { type amount description created_at }";

pub(crate) fn find_by_name_document() -> String {
    format!(
        "query FindByName($name: String) {{ findByName(name: $name) {{ {CARTRIDGE_FIELDS} }} }}"
    )
}

pub(crate) fn update_amount_document() -> String {
    format!(
        "mutation UpdateAmount($id: ID!, $amount: Int!, $type: String!) \
         {{ updateAmount(id: $id, amount: $amount, type: $type) {{ {CARTRIDGE_FIELDS} }} }}"
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequest<'a, V> {
    operation_name: &'a str,
    query: String,
    variables: &'a V,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Vec<GraphqlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindByNameData {
    find_by_name: Option<Cartridge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAmountData {
    update_amount: Option<Cartridge>,
}

/// Cartridge gateway talking GraphQL to the configured cartridge server.
///
/// The endpoint passed to each call is the full GraphQL URL; requests are
/// `POST`ed as JSON.
#[derive(Debug, Clone)]
pub struct GraphqlGateway {
    client: reqwest::Client,
}

impl GraphqlGateway {
    /// Build a gateway whose requests give up after `timeout`.
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

    async fn execute<V, D>(
        &self,
        endpoint: &str,
        operation_name: &str,
        query: String,
        variables: &V,
    ) -> Result<D, GatewayError>
    where
        V: Serialize + Sync,
        D: DeserializeOwned + Send,
    {
        let url = reqwest::Url::parse(endpoint)
            .map_err(|e| GatewayError::Endpoint(format!("{endpoint}: {e}")))?;

        tracing::debug!(operation = operation_name, %url, "graphql request");

        let resp = self
            .client
            .post(url)
            .json(&GraphqlRequest {
                operation_name,
                query,
                variables,
            })
            .send()
            .await
            .map_err(GatewayError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(
                operation = operation_name,
                status = status.as_u16(),
                "graphql request failed"
            );
            return Err(GatewayError::Status(status.as_u16(), body));
        }

        let body: GraphqlResponse<D> = resp.json().await.map_err(GatewayError::from_reqwest)?;
        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            tracing::warn!(operation = operation_name, errors = ?messages, "graphql errors");
            return Err(GatewayError::Remote(messages));
        }

        body.data
            .ok_or_else(|| GatewayError::Decode(format!("{operation_name}: response has no data")))
    }
}

#[async_trait]
impl CartridgeGateway for GraphqlGateway {
    async fn find_by_name(
        &self,
        endpoint: &str,
        vars: &LookupVars,
    ) -> Result<Option<Cartridge>, GatewayError> {
        let data: FindByNameData = self
            .execute(endpoint, "FindByName", find_by_name_document(), vars)
            .await?;
        Ok(data.find_by_name)
    }

    async fn update_amount(
        &self,
        endpoint: &str,
        vars: &UpdateAmountVars,
    ) -> Result<Cartridge, GatewayError> {
        let data: UpdateAmountData = self
            .execute(endpoint, "UpdateAmount", update_amount_document(), vars)
            .await?;
        data.update_amount
            .ok_or_else(|| GatewayError::Decode("updateAmount returned null".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_select_the_same_fields() {
        assert!(find_by_name_document().contains("findByName(name: $name)"));
        assert!(
            update_amount_document()
                .contains("updateAmount(id: $id, amount: $amount, type: $type)")
        );
        assert!(find_by_name_document().ends_with(&format!("{{ {CARTRIDGE_FIELDS} }} }}")));
    }

    #[test]
    fn response_errors_are_collected() {
        let body: GraphqlResponse<FindByNameData> = serde_json::from_value(serde_json::json!({
            "data": null,
            "errors": [{"message": "boom"}, {"message": "again", "path": ["findByName"]}]
        }))
        .unwrap();
        assert!(body.data.is_none());
        assert_eq!(body.errors.len(), 2);
    }

    #[tokio::test]
    async fn rejects_malformed_endpoint_without_network() {
        let gateway = GraphqlGateway::new(Duration::from_secs(1)).unwrap();
        let err = gateway
            .find_by_name("not a url", &LookupVars { name: Some("CRT-001".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Endpoint(_)));
    }
}
