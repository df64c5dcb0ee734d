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

//! Per-request context handed down the handler call chain.

use crate::{
    InputConfig, SessionResult, flash::FlashRelay, input::Input, params::Params,
    session::SessionStore,
};
use serde_json::Value;
use std::sync::Arc;

/// The input of one request together with its old input relay.
#[derive(Debug)]
pub struct RequestContext<S> {
    input: Input,
    relay: FlashRelay<S>,
}

impl<S: SessionStore> RequestContext<S> {
    /// Opens the context of a new request on `session`.
    pub async fn begin(input: Input, session: Arc<S>, config: &InputConfig) -> SessionResult<Self> {
        let relay = FlashRelay::begin(session, config).await?;
        Ok(Self { input, relay })
    }

    #[inline]
    pub fn input(&self) -> &Input {
        &self.input
    }

    #[inline]
    pub fn relay(&self) -> &FlashRelay<S> {
        &self.relay
    }

    pub async fn flash(&self) -> SessionResult<()> {
        self.relay.flash(&self.input).await
    }

    pub async fn flash_only<I, K>(&self, keys: I) -> SessionResult<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.relay.flash_only(&self.input, keys).await
    }

    pub async fn flash_except<I, K>(&self, keys: I) -> SessionResult<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.relay.flash_except(&self.input, keys).await
    }

    pub async fn flash_params(&self, params: Params) -> SessionResult<()> {
        self.relay.flash_params(params).await
    }

    pub async fn old(&self, key: &str) -> SessionResult<Option<&Value>> {
        self.relay.old(key).await
    }

    pub async fn old_or<V: Into<Value>>(&self, key: &str, default: V) -> SessionResult<Value> {
        self.relay.old_or(key, default).await
    }

    pub async fn old_input(&self) -> SessionResult<&Params> {
        self.relay.old_input().await
    }

    /// Gives back the input, dropping the relay.
    pub fn into_input(self) -> Input {
        self.input
    }
}
