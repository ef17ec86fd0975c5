use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::config::StoreConfig;
use crate::database::store::{Order, Store, StoreError, Table};

const REST_PATH: &str = "rest/v1";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Client for the PostgREST endpoint exposed by the hosted database.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: Url,
    service_key: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .build()
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &StoreConfig) -> Self {
        Self {
            client,
            base_url: config.url.clone(),
            service_key: config.service_key.clone(),
        }
    }

    /// `{base}/rest/v1/{table}`, keeping any path prefix on the base URL.
    pub fn table_url(&self, table: Table) -> Url {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}/{}/{}", prefix, REST_PATH, table.as_str()));
        url.set_query(None);
        url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

#[async_trait]
impl Store for RestStore {
    async fn select_all(&self, table: Table, order: Order) -> Result<Vec<Value>, StoreError> {
        let direction = if order.descending { "desc" } else { "asc" };
        let mut url = self.table_url(table);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", &format!("{}.{}", order.column, direction));

        debug!("store select {}", url);
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        match read_body(response).await? {
            Value::Array(rows) => Ok(rows),
            other => Err(StoreError::new(format!(
                "expected an array of rows from {}, got {}",
                table,
                json_kind(&other)
            ))),
        }
    }

    async fn insert_one(&self, table: Table, row: Map<String, Value>) -> Result<Value, StoreError> {
        let mut url = self.table_url(table);
        url.query_pairs_mut().append_pair("select", "*");

        debug!("store insert {}", url);
        let response = self
            .authorized(self.client.post(url))
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(&row)
            .send()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        read_body(response).await
    }
}

async fn read_body(response: Response) -> Result<Value, StoreError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| StoreError::new(e.to_string()))?;

    if !status.is_success() {
        return Err(error_from_body(status, &text));
    }

    serde_json::from_str(&text).map_err(|e| StoreError::new(e.to_string()))
}

/// PostgREST reports failures as `{code, details, hint, message}`.
fn error_from_body(status: StatusCode, body: &str) -> StoreError {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = obj.get("message") {
            return StoreError::new(message.clone());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        StoreError::new(status.to_string())
    } else {
        StoreError::new(trimmed)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
