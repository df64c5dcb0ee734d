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

//! Merged, read-only view of one request's input.
//!
//! Route parameters, the query string and the body are merged once, when the
//! [`Input`] is built, with later sources overwriting earlier ones on the
//! same top-level key: route, then query, then body. Lookups afterwards never
//! fail; a key that does not resolve yields `None` or the given default.

use crate::{config::InputConfig, params::Params, upload::UploadedFile};
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

/// Request input store, built once per request by [`InputBuilder`].
#[derive(Debug, Default)]
pub struct Input {
    params: Params,
    files: HashMap<String, Box<dyn UploadedFile>>,
}

impl Input {
    /// New builder with default config.
    pub fn builder() -> InputBuilder {
        InputBuilder::new()
    }

    /// Input made of already merged parameters and no files.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            files: HashMap::new(),
        }
    }

    /// Resolves `key` as a dot-path, e.g. `products.0.name`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.lookup(key)
    }

    /// Resolves `key`, falling back to `default`.
    pub fn get_or<V: Into<Value>>(&self, key: &str, default: V) -> Value {
        match self.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Resolves `key` to a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Whether `key` resolves. An explicit `null` is present.
    #[inline]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether `key` resolves to something other than `null` or a blank
    /// string.
    pub fn filled(&self, key: &str) -> bool {
        match self.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// All merged top-level parameters.
    #[inline]
    pub fn all(&self) -> &Params {
        &self.params
    }

    /// The given top-level keys that exist. Dot-paths are not expanded.
    pub fn only<I, K>(&self, keys: I) -> Params
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.params.only(keys)
    }

    /// All parameters but the given top-level keys.
    pub fn except<I, K>(&self, keys: I) -> Params
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.params.except(keys)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Uploaded file of form field `name`.
    pub fn file(&self, name: &str) -> Option<&dyn UploadedFile> {
        self.files.get(name).map(|file| &**file)
    }

    /// Whether a file was uploaded for form field `name`. Stays true after
    /// the file is moved; use [`UploadedFile::is_valid`] to tell the two
    /// apart.
    pub fn has_file(&self, name: &str) -> bool {
        self.file(name)
            .is_some_and(|file| !file.path().as_os_str().is_empty())
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &dyn UploadedFile)> {
        self.files
            .iter()
            .map(|(name, file)| (name.as_str(), &**file))
    }
}

/// Builder for [`Input`], collecting the sources of one request.
#[derive(Debug, Default)]
pub struct InputBuilder {
    config: InputConfig,
    route: Params,
    query_string: Option<String>,
    query: Params,
    content_type: Option<String>,
    raw_body: Option<Bytes>,
    body: Params,
    files: HashMap<String, Box<dyn UploadedFile>>,
}

impl InputBuilder {
    /// New builder with default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the config used to decode the query string and body.
    pub fn config(mut self, config: InputConfig) -> Self {
        self.config = config;
        self
    }

    /// Add one route parameter.
    pub fn route_param<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.route.insert(key.into(), value.into());
        self
    }

    /// Add route parameters matched by the router.
    pub fn route(mut self, route: Params) -> Self {
        self.route.merge(route);
        self
    }

    /// Set the raw query string, decoded on [`InputBuilder::build`].
    pub fn query_str<S: Into<String>>(mut self, query_string: S) -> Self {
        self.query_string = Some(query_string.into());
        self
    }

    /// Add already decoded query parameters. They overwrite keys of the raw
    /// query string.
    pub fn query(mut self, query: Params) -> Self {
        self.query.merge(query);
        self
    }

    /// Set the raw body and its content type, decoded on
    /// [`InputBuilder::build`].
    pub fn raw_body<B: Into<Bytes>>(mut self, content_type: Option<&str>, body: B) -> Self {
        self.content_type = content_type.map(ToOwned::to_owned);
        self.raw_body = Some(body.into());
        self
    }

    /// Add already decoded body parameters. They overwrite keys of the raw
    /// body.
    pub fn body(mut self, body: Params) -> Self {
        self.body.merge(body);
        self
    }

    /// Attach an uploaded file to form field `name`.
    pub fn file<K, F>(mut self, name: K, file: F) -> Self
    where
        K: Into<String>,
        F: UploadedFile + 'static,
    {
        self.files.insert(name.into(), Box::new(file));
        self
    }

    /// Take the query string, content type and body of an `http` request.
    #[cfg(feature = "http")]
    #[cfg_attr(docsrs, doc(cfg(feature = "http")))]
    pub fn http_parts<B: Into<Bytes>>(self, parts: &http::request::Parts, body: B) -> Self {
        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        let builder = self.raw_body(content_type, body);
        match parts.uri.query() {
            Some(query) => builder.query_str(query),
            None => builder,
        }
    }

    /// Decode and merge all sources. Never fails; undecodable sources are
    /// empty.
    pub fn build(self) -> Input {
        let max_depth = self.config.max_nesting_depth();

        let mut query = match &self.query_string {
            Some(query_string) => Params::from_query(query_string, max_depth),
            None => Params::new(),
        };
        query.merge(self.query);

        let mut body = match &self.raw_body {
            Some(raw_body) => Params::from_body(self.content_type.as_deref(), raw_body, max_depth),
            None => Params::new(),
        };
        body.merge(self.body);

        trace!(
            route = self.route.len(),
            query = query.len(),
            body = body.len(),
            files = self.files.len(),
            "Built request input."
        );

        let mut params = self.route;
        params.merge(query);
        params.merge(body);

        Input {
            params,
            files: self.files,
        }
    }
}
