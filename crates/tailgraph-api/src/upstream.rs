// Copyright (C) 2025 Joseph Sacchini
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU Affero General Public License as published by the Free
// Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected payload from {path}: {source}")]
    Payload {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Authenticated handle to the tailnet management API.
///
/// Holds no per-request state; idle connections are not kept between calls.
#[derive(Clone)]
pub struct Upstream {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Upstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(0)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(UpstreamError::Client)?;

        let base_url = format!(
            "{}/{}",
            config.api_base_host.trim_end_matches('/'),
            config.tailnet_domain.trim_matches('/'),
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn request(&self, method: Method, path: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "calling upstream");

        let resp = self
            .client
            .request(method, &url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = resp.status();
        debug!(status = status.as_u16(), "received upstream response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "upstream returned unexpected status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }

    /// `GET path`, decoded into an upstream wire type.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let value = self.request(Method::GET, path).await?;
        serde_json::from_value(value).map_err(|source| UpstreamError::Payload {
            path: path.to_string(),
            source,
        })
    }
}
