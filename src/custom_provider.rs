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

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tf_provider::{map, Diagnostics, Provider, Schema, ValueEmpty};

use crate::client::Client;
use crate::config::{Environment, ProcessEnvironment, ProviderConfig};
use crate::utils::{Masked, WithSchema};

#[derive(Debug, Clone)]
pub struct CustomProvider<E: Environment = ProcessEnvironment> {
    /// "dev" when built locally, "test" in tests, the crate version on release
    version: String,
    env: Arc<E>,
    client: Arc<RwLock<Option<Arc<Client>>>>,
}

impl CustomProvider<ProcessEnvironment> {
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_env(version, ProcessEnvironment)
    }
}

impl Default for CustomProvider<ProcessEnvironment> {
    fn default() -> Self {
        Self::new("dev")
    }
}

impl<E: Environment> CustomProvider<E> {
    pub fn with_env(version: impl Into<String>, env: E) -> Self {
        Self {
            version: version.into(),
            env: Arc::new(env),
            client: Default::default(),
        }
    }

    /// Client created by `configure`, to be handed to resources and data sources
    pub async fn client(&self) -> Option<Arc<Client>> {
        self.client.read().await.clone()
    }
}

#[async_trait]
impl<E: Environment> Provider for CustomProvider<E> {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ProviderConfig::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        config.validate(diags);

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        tracing::info!(
            provider_version = %self.version,
            terraform_version = %terraform_version,
            "Configuring Custom client"
        );

        let resolved = config.resolve(diags, self.env.as_ref())?;

        tracing::debug!(
            custom_url = %resolved.url,
            custom_token = %Masked(&resolved.token),
            "Creating Custom client"
        );

        let client = match Client::new(&resolved.url, &resolved.token, &self.version) {
            Ok(client) => client,
            Err(err) => {
                diags.root_error(
                    "Unable to Create Custom API Client",
                    format!(
                        "An unexpected error occurred when creating the Custom API client. \
                        If the error is not clear, please contact the provider developers.\n\n\
                        Custom Client Error: {err}"
                    ),
                );
                return None;
            }
        };

        tracing::info!(
            custom_url = %client.base_url(),
            success = true,
            "Configured Custom client"
        );

        *self.client.write().await = Some(Arc::new(client));

        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn tf_provider::resource::DynamicResource>>> {
        Some(map! {})
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn tf_provider::data_source::DynamicDataSource>>> {
        Some(map! {})
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use tf_provider::Value;

    use super::*;
    use crate::client::ClientError;
    use crate::config::{TOKEN_ENV, URL_ENV};

    fn provider(vars: &[(&str, &str)]) -> CustomProvider<HashMap<String, String>> {
        CustomProvider::with_env(
            "test",
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn config<'a>(url: &'a str, token: &'a str) -> ProviderConfig<'a> {
        ProviderConfig {
            url: Value::Value(Cow::Borrowed(url)),
            token: Value::Value(Cow::Borrowed(token)),
        }
    }

    #[tokio::test]
    async fn configure_from_declared_values() {
        let provider = provider(&[(URL_ENV, "https://env.example.com")]);
        let mut diags = Diagnostics::default();

        let result = provider
            .configure(
                &mut diags,
                "1.9.0".to_string(),
                config("https://declared.example.com/api", "secret"),
            )
            .await;

        assert_eq!(result, Some(()));
        assert!(diags.errors.is_empty());
        let client = provider.client().await.unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://declared.example.com/api/"
        );
    }

    #[tokio::test]
    async fn configure_from_environment() {
        let provider = provider(&[
            (URL_ENV, "http://localhost:8080"),
            (TOKEN_ENV, "secret"),
        ]);
        let mut diags = Diagnostics::default();

        let result = provider
            .configure(&mut diags, "1.9.0".to_string(), Default::default())
            .await;

        assert_eq!(result, Some(()));
        let client = provider.client().await.unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
    }

    #[tokio::test]
    async fn configure_missing_values() {
        let provider = provider(&[]);
        let mut diags = Diagnostics::default();

        let result = provider
            .configure(&mut diags, "1.9.0".to_string(), Default::default())
            .await;

        assert_eq!(result, None);
        assert_eq!(diags.errors.len(), 2);
        assert!(provider.client().await.is_none());
    }

    #[tokio::test]
    async fn configure_unknown_value() {
        let provider = provider(&[(TOKEN_ENV, "secret")]);
        let mut diags = Diagnostics::default();

        let result = provider
            .configure(
                &mut diags,
                "1.9.0".to_string(),
                ProviderConfig {
                    url: Value::Unknown,
                    token: Value::Null,
                },
            )
            .await;

        assert_eq!(result, None);
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].summary, "Unknown Custom API Url");
        assert!(provider.client().await.is_none());
    }

    #[tokio::test]
    async fn client_error_is_reported_verbatim() {
        let provider = provider(&[]);
        let mut diags = Diagnostics::default();

        let result = provider
            .configure(
                &mut diags,
                "1.9.0".to_string(),
                config("http://localhost:8080", "sec\nret"),
            )
            .await;

        assert_eq!(result, None);
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].summary, "Unable to Create Custom API Client");
        assert!(diags.errors[0]
            .detail
            .ends_with(&format!("Custom Client Error: {}", ClientError::InvalidToken)));
        assert!(provider.client().await.is_none());
    }

    #[tokio::test]
    async fn validate_reports_invalid_url() {
        let provider = provider(&[]);
        let mut diags = Diagnostics::default();

        let result = provider
            .validate(&mut diags, config("localhost:8080", "secret"))
            .await;

        assert_eq!(result, None);
        assert_eq!(diags.errors[0].summary, "Invalid Custom API Url");
    }

    #[test]
    fn no_resources_nor_data_sources() {
        let provider = provider(&[]);
        let mut diags = Diagnostics::default();

        assert!(provider.get_resources(&mut diags).unwrap().is_empty());
        assert!(provider.get_data_sources(&mut diags).unwrap().is_empty());
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn schema_declares_url_and_token() {
        let provider = provider(&[]);
        let mut diags = Diagnostics::default();

        let schema = provider.schema(&mut diags).unwrap();
        let mut attributes = schema.block.attributes.keys().collect::<Vec<_>>();
        attributes.sort();

        assert_eq!(schema.version, 1);
        assert_eq!(attributes, ["token", "url"]);
    }

    /// Writer collecting the formatted log lines
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn configure_masks_token_in_logs() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let provider = provider(&[]);
        let mut diags = Diagnostics::default();
        let result = provider
            .configure(
                &mut diags,
                "1.9.0".to_string(),
                config("http://localhost:8080", "very-secret-token"),
            )
            .await;

        assert_eq!(result, Some(()));
        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("Creating Custom client"));
        assert!(logs.contains("custom_token=***"));
        assert!(!logs.contains("very-secret-token"));
    }
}
