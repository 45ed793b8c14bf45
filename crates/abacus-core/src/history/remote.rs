//! History kept by a remote server (requires "remote" feature)
//!
//! Talks to the `/history` endpoints of the account backend:
//! `GET` lists, `POST {expression, result}` appends, `DELETE` clears.
//! Requests are authenticated with a bearer token; the server decides which
//! account they belong to.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use super::{HistoryEntry, HistoryStore, StoreError};

/// Body of every `/history` response
#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    history: Vec<HistoryEntry>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct NewEntry<'a> {
    expression: &'a str,
    result: &'a str,
}

/// Blocking client for the remote history API
pub struct RemoteStore {
    base_url: String,
    client: Client,
    runtime: Runtime,
}

impl RemoteStore {
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| StoreError::Remote(format!("Invalid token: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Remote(format!("Failed to build client: {e}")))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            runtime,
        })
    }

    fn url(&self) -> String {
        format!("{}/history", self.base_url)
    }

    fn send(&self, request: RequestBuilder) -> Result<HistoryResponse, StoreError> {
        self.runtime.block_on(async {
            let response = request
                .send()
                .await
                .map_err(|e| StoreError::Remote(format!("Failed to reach server: {e}")))?;
            let status = response.status();
            let body: HistoryResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Remote(format!("Failed to parse response: {e}")))?;

            if !status.is_success() || !body.success {
                let message = body
                    .message
                    .clone()
                    .unwrap_or_else(|| status.to_string());
                return Err(StoreError::Rejected(message));
            }
            Ok(body)
        })
    }
}

impl HistoryStore for RemoteStore {
    // The server identifies the account from the token, so `user_id` only
    // shows up in logs.
    fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryEntry>, StoreError> {
        tracing::debug!(user_id, url = %self.url(), "fetching remote history");
        let response = self.send(self.client.get(self.url()))?;
        Ok(response.history)
    }

    fn append_history(&mut self, user_id: &str, entry: &HistoryEntry) -> Result<(), StoreError> {
        tracing::debug!(user_id, expression = %entry.expression, "appending remote history");
        let body = NewEntry {
            expression: &entry.expression,
            result: &entry.result,
        };
        self.send(self.client.post(self.url()).json(&body))?;
        Ok(())
    }

    fn clear_history(&mut self, user_id: &str) -> Result<(), StoreError> {
        tracing::debug!(user_id, "clearing remote history");
        self.send(self.client.delete(self.url()))?;
        Ok(())
    }
}
