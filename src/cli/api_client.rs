use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::env;

use crate::cli::error::{CliError, CliResult};

/// Environment variable pointing the CLI at a server.
pub const API_URL_ENV: &str = "TODO_FEED_API_URL";

/// Server used when neither the flag nor the environment names one.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// API client for communicating with the todo feed REST API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// Priority for base URL:
    /// 1. Explicit `api_url` parameter
    /// 2. TODO_FEED_API_URL environment variable
    /// 3. Default: http://localhost:3000
    pub fn new(api_url: Option<String>) -> Self {
        let base_url = api_url
            .or_else(|| env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a GET request builder
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path))
    }

    /// Create a POST request builder
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path))
    }

    /// Create a PUT request builder
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.put(self.url(path))
    }

    /// Create a PATCH request builder
    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.patch(self.url(path))
    }

    /// Create a DELETE request builder
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.delete(self.url(path))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Handle API response with standardized error handling
    ///
    /// Returns the deserialized response body on success,
    /// or a CliError::ApiError on non-success status codes.
    pub async fn handle_response<T: DeserializeOwned>(response: Response) -> CliResult<T> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| CliError::InvalidResponse {
                    message: e.to_string(),
                })
        } else {
            Err(Self::api_error(response).await)
        }
    }

    /// Like `handle_response`, for endpoints that answer without a body.
    pub async fn handle_empty_response(response: Response) -> CliResult<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn api_error(response: Response) -> CliError {
        let status = response.status().as_u16();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        CliError::ApiError {
            status,
            message: error_message(&error_text),
        }
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
