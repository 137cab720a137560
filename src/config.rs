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
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType};
use tf_provider::value::{Value, ValueString};
use tf_provider::{map, AttributePath, Block, Description, Diagnostics, Schema};

use crate::client::parse_url;
use crate::utils::WithSchema;

pub const URL_ENV: &str = "CUSTOM_URL";
pub const TOKEN_ENV: &str = "CUSTOM_TOKEN";

/// Source of environment variables
pub trait Environment: Debug + Send + Sync + 'static {
    fn var(&self, key: &str) -> Option<String>;
}

/// Environment of the plugin process
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Provider block as declared in the Terraform configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub url: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub token: ValueString<'a>,
}

/// Provider configuration once every value is known and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub url: String,
    pub token: String,
}

impl<'a> WithSchema for ProviderConfig<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                description: Description::plain("Interact with the Custom API"),
                attributes: map! {
                    "url" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!(
                            "URL of the Custom API. May also be provided via the {URL_ENV} environment variable."
                        )),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "token" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!(
                            "Token used to authenticate against the Custom API. May also be provided via the {TOKEN_ENV} environment variable."
                        )),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                },
                ..Default::default()
            },
        }
    }
}

impl<'a> ProviderConfig<'a> {
    /// Check the declared values that can be checked before `configure`
    pub fn validate(&self, diags: &mut Diagnostics) {
        if let Value::Value(url) = &self.url {
            if url.is_empty() {
                return;
            }
            if let Err(err) = parse_url(url) {
                diags.error(
                    "Invalid Custom API Url",
                    format!(
                        "The url `{url}` is not a valid Custom API url: {err}. \
                        The url must be absolute and use either the http or the https scheme."
                    ),
                    AttributePath::new("url"),
                );
            }
        }
    }

    /// Merge the declared values with the environment
    ///
    /// A declared value takes precedence over the environment. Unknown values
    /// are reported before the environment is consulted.
    pub fn resolve<E: Environment + ?Sized>(
        &self,
        diags: &mut Diagnostics,
        env: &E,
    ) -> Option<ResolvedConfig> {
        let error_count = diags.errors.len();

        if self.url.is_unknown() {
            diags.error(
                "Unknown Custom API Url",
                format!(
                    "The provider cannot create the Custom API client as there is an unknown configuration value for the Custom API url. \
                    Either target apply the source of the value first, set the value statically in the configuration, or use the {URL_ENV} environment variable."
                ),
                AttributePath::new("url"),
            );
        }

        if self.token.is_unknown() {
            diags.error(
                "Unknown Custom API Token",
                format!(
                    "The provider cannot create the Custom API client as there is an unknown configuration value for the Custom API token. \
                    Either target apply the source of the value first, set the value statically in the configuration, or use the {TOKEN_ENV} environment variable."
                ),
                AttributePath::new("token"),
            );
        }

        if diags.errors.len() > error_count {
            return None;
        }

        let url = resolve_value(&self.url, env, URL_ENV);
        let token = resolve_value(&self.token, env, TOKEN_ENV);

        if url.is_empty() {
            diags.error(
                "Missing Custom API Url",
                format!(
                    "The provider cannot create the Custom API client as there is a missing or empty value for the Custom API url. \
                    Set the url value in the configuration or use the {URL_ENV} environment variable. \
                    If either is already set, ensure the value is not empty."
                ),
                AttributePath::new("url"),
            );
        }

        if token.is_empty() {
            diags.error(
                "Missing Custom API Token",
                format!(
                    "The provider cannot create the Custom API client as there is a missing or empty value for the Custom API token. \
                    Set the token value in the configuration or use the {TOKEN_ENV} environment variable. \
                    If either is already set, ensure the value is not empty."
                ),
                AttributePath::new("token"),
            );
        }

        if diags.errors.len() > error_count {
            return None;
        }

        Some(ResolvedConfig { url, token })
    }
}

fn resolve_value<E: Environment + ?Sized>(value: &ValueString, env: &E, var: &str) -> String {
    match value {
        Value::Value(value) => value.to_string(),
        Value::Null | Value::Unknown => env.var(var).unwrap_or_default(),
    }
}
