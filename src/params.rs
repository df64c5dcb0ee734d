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

//! Request parameters builder and container.
//!
//! This module provides the `Params` struct, one top-level mapping of
//! parameter names to nested values. Route parameters, the query string and
//! the body each produce a `Params`, which [`crate::Input`] then merges.

use crate::{body, path, query};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};

/// Top-level parameter mapping of one input source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Creates an empty parameter mapping.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter with the given key and value.
    ///
    /// # Arguments
    ///
    /// * `key` - The parameter name
    /// * `value` - The parameter value
    #[inline]
    pub fn custom<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    /// Decodes a url-encoded query string, with or without the leading `?`.
    ///
    /// # Arguments
    ///
    /// * `query` - The query string part of the URL
    /// * `max_depth` - Bracket nesting allowed in keys
    pub fn from_query(query: &str, max_depth: usize) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Params(query::parse(query.as_bytes(), max_depth))
    }

    /// Decodes a raw request body according to its content type.
    ///
    /// # Arguments
    ///
    /// * `content_type` - The `Content-Type` header of the request, if any
    /// * `body` - The raw request body
    /// * `max_depth` - Bracket nesting allowed in form keys
    pub fn from_body(content_type: Option<&str>, body: &[u8], max_depth: usize) -> Self {
        Params(body::decode(content_type, body, max_depth))
    }

    /// Resolves a dot-path, see [`crate::path`].
    #[inline]
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        path::resolve(&self.0, key)
    }

    /// Copy containing only the given top-level keys that exist.
    pub fn only<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut only = Map::new();
        for key in keys {
            let key = key.as_ref();
            if let Some(value) = self.0.get(key) {
                only.insert(key.to_owned(), value.clone());
            }
        }
        Params(only)
    }

    /// Copy without the given top-level keys.
    pub fn except<I, K>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut except = self.0.clone();
        for key in keys {
            except.shift_remove(key.as_ref());
        }
        Params(except)
    }

    /// Overwrites top-level keys with those of `other`.
    pub fn merge(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    #[inline]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl Deref for Params {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Params {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params(map)
    }
}

impl From<Params> for Map<String, Value> {
    fn from(params: Params) -> Self {
        params.0
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        Value::Object(params.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Params(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
