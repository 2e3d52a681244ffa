//! HTTP implementation of `EmoteSetApi`.
//!
//! Reads go through the REST endpoint (`GET /emote-sets/{id}`), mutations
//! through the GraphQL endpoint with a bearer token.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use seventv_core::{EmoteSet, Error, Result, SevenTvConfig};
use tracing::debug;

use crate::client::EmoteSetApi;

const CREATE_EMOTE_SET: &str = "mutation CreateEmoteSet($user_id: ObjectID!, $data: CreateEmoteSetInput!) { createEmoteSet(user_id: $user_id, data: $data) { id } }";
const UPDATE_EMOTE_SET: &str = "mutation UpdateEmoteSet($id: ObjectID!, $data: UpdateEmoteSetInput!) { emoteSet(id: $id) { update(data: $data) { id } } }";
const DELETE_EMOTE_SET: &str = "mutation DeleteEmoteSet($id: ObjectID!) { deleteEmoteSet(id: $id) }";
const CHANGE_EMOTE_IN_SET: &str = "mutation ChangeEmoteInSet($id: ObjectID!, $action: ListItemAction!, $emote_id: ObjectID!, $name: String) { emoteSet(id: $id) { id emotes(id: $emote_id, action: $action, name: $name) { id } } }";

#[derive(Debug, Deserialize)]
struct GqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GqlError>,
}

#[derive(Debug, Deserialize)]
struct GqlError {
    message: String,
}

/// 7TV client over REST + GraphQL.
pub struct HttpClient {
    client: Client,
    config: SevenTvConfig,
}

impl HttpClient {
    pub fn new(config: SevenTvConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("seventv-reconcile/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SevenTvConfig {
        &self.config
    }

    async fn gql(&self, query: &str, variables: Value) -> Result<Value> {
        let token = self.config.require_token()?;

        debug!("GraphQL request to {}", self.config.gql_url);

        let response = self
            .client
            .post(&self.config.gql_url)
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_gql(&body)
    }

    async fn change_emote(
        &self,
        set_id: &str,
        emote_id: &str,
        action: &str,
        name: Option<&str>,
    ) -> Result<()> {
        self.gql(
            CHANGE_EMOTE_IN_SET,
            json!({
                "id": set_id,
                "action": action,
                "emote_id": emote_id,
                "name": name,
            }),
        )
        .await?;
        Ok(())
    }
}

/// Decode a GraphQL envelope, turning its `errors` array into an error.
fn parse_gql(body: &str) -> Result<Value> {
    let parsed: GqlResponse = serde_json::from_str(body)?;

    if !parsed.errors.is_empty() {
        let message = parsed
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let lower = message.to_lowercase();
        if lower.contains("not found") || lower.contains("unknown") {
            return Err(Error::NotFound(message));
        }
        return Err(Error::GraphQl(message));
    }

    parsed
        .data
        .ok_or_else(|| Error::GraphQl("response carried neither data nor errors".into()))
}

impl EmoteSetApi for HttpClient {
    async fn create_emote_set(&self, name: &str) -> Result<String> {
        let user_id = self.config.require_user_id()?;
        let data = self
            .gql(
                CREATE_EMOTE_SET,
                json!({ "user_id": user_id, "data": { "name": name } }),
            )
            .await?;

        data.pointer("/createEmoteSet/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::GraphQl("createEmoteSet returned no id".into()))
    }

    async fn get_emote_set(&self, id: &str) -> Result<EmoteSet> {
        let url = format!("{}/emote-sets/{}", self.config.api_url.trim_end_matches('/'), id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("emote set {}", id)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<EmoteSet>()
            .await
            .map_err(|e| Error::Http(format!("Invalid emote set payload: {}", e)))
    }

    async fn update_emote_set(&self, id: &str, name: &str) -> Result<()> {
        self.gql(UPDATE_EMOTE_SET, json!({ "id": id, "data": { "name": name } }))
            .await?;
        Ok(())
    }

    async fn delete_emote_set(&self, id: &str) -> Result<()> {
        self.gql(DELETE_EMOTE_SET, json!({ "id": id })).await?;
        Ok(())
    }

    async fn add_emote_to_set(&self, set_id: &str, emote_id: &str, name: Option<&str>) -> Result<()> {
        self.change_emote(set_id, emote_id, "ADD", name).await
    }

    async fn delete_emote_binding(&self, set_id: &str, emote_id: &str) -> Result<()> {
        self.change_emote(set_id, emote_id, "REMOVE", None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gql_data() {
        let data = parse_gql(r#"{"data": {"createEmoteSet": {"id": "abc"}}}"#).unwrap();
        assert_eq!(data.pointer("/createEmoteSet/id").unwrap(), "abc");
    }

    #[test]
    fn test_parse_gql_errors_joined() {
        let err = parse_gql(r#"{"data": null, "errors": [{"message": "a"}, {"message": "b"}]}"#)
            .unwrap_err();
        match err {
            Error::GraphQl(msg) => assert_eq!(msg, "a; b"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_gql_not_found() {
        let err = parse_gql(r#"{"errors": [{"message": "70440 Unknown Emote Set"}]}"#).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_gql_empty_envelope() {
        assert!(matches!(parse_gql("{}"), Err(Error::GraphQl(_))));
        assert!(matches!(parse_gql("not json"), Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_mutations_require_token() {
        let client = HttpClient::new(SevenTvConfig::default()).unwrap();
        let err = client.update_emote_set("abc", "pog").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_create_requires_user_id() {
        let config = SevenTvConfig {
            token: Some("secret".into()),
            ..Default::default()
        };
        let client = HttpClient::new(config).unwrap();
        let err = client.create_emote_set("pog").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
