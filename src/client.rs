// This file is part of the terraform-provider-custom project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use thiserror::Error;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme `{0}`, expected `http` or `https`")]
    UnsupportedScheme(String),

    #[error("url `{0}` has no host")]
    MissingHost(String),

    #[error("token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Parse and check an API url
pub fn parse_url(url: &str) -> Result<Url, ClientError> {
    let parsed = Url::parse(url).map_err(|source| ClientError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    match parsed.scheme() {
        "http" | "https" => (),
        scheme => return Err(ClientError::UnsupportedScheme(scheme.to_string())),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ClientError::MissingHost(url.to_string()));
    }

    Ok(parsed)
}

/// Client for the Custom API, shared by resources and data sources
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(url: &str, token: &str, version: &str) -> Result<Self, ClientError> {
        let mut base_url = parse_url(url)?;
        // Keep the last path segment when joining relative endpoints
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {token}")).or(Err(ClientError::InvalidToken))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(format!("terraform-provider-custom/{version}"))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path relative to the base url
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                url: path.to_string(),
                source,
            })
    }

    /// Underlying HTTP client, with authentication already set up
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
