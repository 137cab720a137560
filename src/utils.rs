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

use tf_provider::Schema;

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

/// Display wrapper hiding a sensitive value in logs
pub struct Masked<'a>(pub &'a str);

impl<'a> std::fmt::Display for Masked<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            f.write_str("***")
        }
    }
}

impl<'a> std::fmt::Debug for Masked<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Masked;

    #[test]
    fn masked_hides_value() {
        assert_eq!(Masked("secret").to_string(), "***");
        assert_eq!(format!("{:?}", Masked("secret")), "***");
    }

    #[test]
    fn masked_empty_stays_empty() {
        assert_eq!(Masked("").to_string(), "");
    }
}
