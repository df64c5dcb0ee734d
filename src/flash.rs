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

//! Old input: flashing request input to the next request.
//!
//! A request that fails validation usually redirects back to its form, and
//! the form wants the submitted values again. The relay stores a
//! [`FlashedBatch`] in the session, and the following request reads it back
//! with [`FlashRelay::old`].
//!
//! A batch lives exactly one request boundary:
//!
//! 1. request N flashes; the batch is stored as [`Generation::Next`],
//! 2. [`FlashRelay::begin`] of request N+1 promotes it to [`Generation::Current`],
//! 3. the first `old` call of request N+1 takes it out of the session,
//! 4. if nobody read it, `begin` of request N+2 drops it.
//!
//! Flashing in request N+1 first takes the current batch into the request
//! cache, so request N's input is still delivered.
//!
//! A session value under the key that does not decode as a batch is removed
//! by whichever step meets it first, which then fails with
//! [`SessionError::Malformed`].

use crate::{
    InputConfig, SessionError, SessionResult, input::Input, params::Params,
    session::SessionStore,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, trace, warn};

/// Which request a flashed batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    /// Written during this request, visible to the next one.
    Next,
    /// Written during the previous request, visible now.
    Current,
}

/// Input snapshot stored in the session between two requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashedBatch {
    pub generation: Generation,
    pub input: Params,
}

impl FlashedBatch {
    /// New batch for the next request.
    pub fn new(input: Params) -> Self {
        Self {
            generation: Generation::Next,
            input,
        }
    }

    /// The batch after crossing one request boundary, `None` once expired.
    pub fn aged(self) -> Option<Self> {
        match self.generation {
            Generation::Next => Some(Self {
                generation: Generation::Current,
                input: self.input,
            }),
            Generation::Current => None,
        }
    }
}

/// Per-request handle flashing input to, and reading old input from, a
/// session.
#[derive(Debug)]
pub struct FlashRelay<S> {
    session: Arc<S>,
    key: String,
    old: OnceCell<Params>,
}

impl<S: SessionStore> FlashRelay<S> {
    /// Opens the relay for a new request, aging the batch left by previous
    /// requests.
    ///
    /// An undecodable value under the key is removed and reported as
    /// [`SessionError::Malformed`]; the next `begin` starts clean.
    pub async fn begin(session: Arc<S>, config: &InputConfig) -> SessionResult<Self> {
        let key = config.old_input_key().to_owned();
        session
            .update(&key, age)
            .await?
            .map_err(|source| SessionError::Malformed {
                key: key.clone(),
                source,
            })?;
        Ok(Self {
            session,
            key,
            old: OnceCell::new(),
        })
    }

    /// Flashes all input to the next request.
    pub async fn flash(&self, input: &Input) -> SessionResult<()> {
        self.flash_params(input.all().clone()).await
    }

    /// Flashes only the given top-level keys.
    pub async fn flash_only<I, K>(&self, input: &Input, keys: I) -> SessionResult<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.flash_params(input.only(keys)).await
    }

    /// Flashes all input but the given top-level keys.
    pub async fn flash_except<I, K>(&self, input: &Input, keys: I) -> SessionResult<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.flash_params(input.except(keys)).await
    }

    /// Flashes `params` to the next request, replacing anything flashed
    /// earlier in this request.
    ///
    /// Old input of this request shares the session key, so it is taken
    /// into the cache before being overwritten.
    pub async fn flash_params(&self, params: Params) -> SessionResult<()> {
        self.old_input().await?;

        let key = self.key.as_str();
        let batch = FlashedBatch::new(params);
        let count = batch.input.len();
        let value = serde_json::to_value(batch).map_err(|source| SessionError::Malformed {
            key: key.to_owned(),
            source,
        })?;
        self.session.put(key, value).await?;
        debug!(key, count, "Flashed input to session.");
        Ok(())
    }

    /// Input flashed by the previous request.
    ///
    /// The first call takes the batch out of the session; later calls in
    /// the same request answer from the cached copy.
    pub async fn old_input(&self) -> SessionResult<&Params> {
        self.old
            .get_or_try_init(|| async {
                let key = self.key.as_str();
                let taken = self.session.update(key, take_current).await?;
                let batch = taken.map_err(|source| SessionError::Malformed {
                    key: key.to_owned(),
                    source,
                })?;
                let input = batch.map(|batch| batch.input).unwrap_or_default();
                debug!(key, count = input.len(), "Took old input from session.");
                Ok::<_, SessionError>(input)
            })
            .await
    }

    /// Resolves `key` as a dot-path in the old input.
    pub async fn old(&self, key: &str) -> SessionResult<Option<&Value>> {
        Ok(self.old_input().await?.lookup(key))
    }

    /// Resolves `key` in the old input, falling back to `default`.
    pub async fn old_or<V: Into<Value>>(&self, key: &str, default: V) -> SessionResult<Value> {
        Ok(match self.old(key).await? {
            Some(value) => value.clone(),
            None => default.into(),
        })
    }

    pub async fn has_old(&self, key: &str) -> SessionResult<bool> {
        Ok(self.old(key).await?.is_some())
    }
}

/// Promotes a pending batch and drops an expired or malformed one.
fn age(value: Option<Value>) -> (Option<Value>, Result<(), serde_json::Error>) {
    let Some(value) = value else {
        return (None, Ok(()));
    };

    let batch = match FlashedBatch::deserialize(&value) {
        Ok(batch) => batch,
        Err(err) => {
            warn!(error = %err, "Dropped malformed flashed input.");
            return (None, Err(err));
        }
    };

    match batch.aged() {
        Some(batch) => {
            trace!("Flashed input became current.");
            match serde_json::to_value(batch) {
                Ok(value) => (Some(value), Ok(())),
                Err(err) => (None, Err(err)),
            }
        }
        None => {
            trace!("Dropped unread old input.");
            (None, Ok(()))
        }
    }
}

/// Removes a current batch, leaving one flashed by this request in place.
#[allow(clippy::type_complexity)]
fn take_current(
    value: Option<Value>,
) -> (Option<Value>, Result<Option<FlashedBatch>, serde_json::Error>) {
    let Some(value) = value else {
        return (None, Ok(None));
    };

    match FlashedBatch::deserialize(&value) {
        Ok(batch) if batch.generation == Generation::Current => (None, Ok(Some(batch))),
        Ok(_) => (Some(value), Ok(None)),
        Err(err) => {
            warn!(error = %err, "Dropped malformed flashed input.");
            (None, Err(err))
        }
    }
}
