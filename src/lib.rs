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

//! Terraform provider for the Custom API.
//!
//! The provider reads its `url` and `token` from the provider block, or from
//! the `CUSTOM_URL` and `CUSTOM_TOKEN` environment variables, and hands an
//! authenticated [`Client`] to its resources and data sources.

pub mod client;
pub mod config;
pub mod custom_provider;
pub mod logging;
mod utils;

pub use client::{Client, ClientError};
pub use custom_provider::CustomProvider;
