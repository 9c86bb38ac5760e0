use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};

/// Body of a GraphQL POST
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default)]
    pub variables: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// Client for the marketplace GraphQL API, normally pointed at the
/// same-origin proxy route.
pub struct GraphQlClient {
    client: Client,
    endpoint: Url,
    token: RwLock<Option<SecretString>>,
}

impl GraphQlClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).cookie_store(true).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Share the session's cookie jar so the auth cookie rides along.
    pub fn with_cookie_jar(endpoint: Url, timeout: Duration, jar: Arc<Jar>) -> Result<Self> {
        let client = Client::builder().timeout(timeout).cookie_provider(jar).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Use a preconfigured `reqwest::Client` (shared cookie jar, test servers).
    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self {
            client,
            endpoint,
            token: RwLock::new(None),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Bearer token sent with every request; `None` to sign out.
    pub fn set_token(&self, token: Option<SecretString>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    /// Run one operation and decode `data` into `T`.
    pub async fn execute<T>(&self, operation_name: &str, query: &str, variables: serde_json::Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = GraphQlRequest {
            query: query.to_string(),
            variables,
            operation_name: Some(operation_name.to_string()),
        };

        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        let bearer = self
            .token
            .read()
            .ok()
            .and_then(|t| t.as_ref().map(|t| format!("Bearer {}", t.expose_secret())));
        if let Some(bearer) = bearer {
            request = request.header(AUTHORIZATION, bearer);
        }

        debug!("GraphQL {} -> {}", operation_name, self.endpoint);
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let parsed: GraphQlResponse<T> = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                warn!("GraphQL {} failed with HTTP {}", operation_name, status);
                return Err(Error::Http {
                    status: status.as_u16(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        if !parsed.errors.is_empty() {
            let messages: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
            warn!("GraphQL {} returned errors: {:?}", operation_name, messages);
            return Err(Error::GraphQl { messages });
        }

        parsed.data.ok_or_else(|| Error::MissingData {
            operation: operation_name.to_string(),
        })
    }
}
