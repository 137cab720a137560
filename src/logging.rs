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

//! Logging setup for the plugin process.
//!
//! Everything goes to stderr: stdout is reserved for the plugin handshake,
//! and Terraform forwards the plugin stderr to its own log output.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Variables holding the log filter, by decreasing priority.
const FILTER_VARS: [&str; 3] = ["TF_LOG_PROVIDER", "TF_LOG", "RUST_LOG"];

/// Install the global subscriber.
///
/// Does nothing if a subscriber was already installed.
pub fn init() {
    let filter = build_filter(
        FILTER_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty())),
    );

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init();
}

/// Terraform levels (`TRACE`, `DEBUG`, ...) map onto tracing levels, and
/// `JSON` means trace. Anything else is read as `RUST_LOG` directives.
fn build_filter(directives: Option<String>) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into());
    let Some(directives) = directives else {
        return builder.parse_lossy("");
    };

    if directives.eq_ignore_ascii_case("json") {
        return builder.parse_lossy(LevelFilter::TRACE.to_string());
    }
    match directives.parse::<LevelFilter>() {
        Ok(level) => builder.parse_lossy(level.to_string()),
        Err(_) => builder.parse_lossy(directives),
    }
}
