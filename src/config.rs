// Copyright 2022 jmjoy
//
// Licensed under the Apache License, Version 2.0 (the "License");
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

//! Configuration shared by input decoding and the flash relay.

use std::borrow::Cow;

/// Session key the flashed input batch is stored under by default.
pub const DEFAULT_OLD_INPUT_KEY: &str = "_old_input";

/// Bracket nesting depth allowed in form keys by default.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Settings for decoding request input and flashing it to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    old_input_key: Cow<'static, str>,
    max_nesting_depth: usize,
}

impl InputConfig {
    /// New config with default settings.
    pub fn new() -> Self {
        Self {
            old_input_key: Cow::Borrowed(DEFAULT_OLD_INPUT_KEY),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Set the session key flashed input is stored under.
    pub fn set_old_input_key<K: Into<Cow<'static, str>>>(mut self, old_input_key: K) -> Self {
        self.old_input_key = old_input_key.into();
        self
    }

    /// Set how many `[...]` levels a form key may nest. Keys nested deeper
    /// are dropped while decoding.
    pub fn set_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }

    #[inline]
    pub fn old_input_key(&self) -> &str {
        &self.old_input_key
    }

    #[inline]
    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InputConfig::default();
        assert_eq!(config.old_input_key(), "_old_input");
        assert_eq!(config.max_nesting_depth(), 64);
    }

    #[test]
    fn test_setters() {
        let config = InputConfig::new()
            .set_old_input_key(String::from("_form"))
            .set_max_nesting_depth(2);
        assert_eq!(config.old_input_key(), "_form");
        assert_eq!(config.max_nesting_depth(), 2);
    }
}
