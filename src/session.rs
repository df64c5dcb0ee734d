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

//! Session store contract used to carry input across requests.
//!
//! The store is the only state shared between requests of one user session,
//! so it is the store's job to make [`SessionStore::update`] atomic: two
//! requests racing on the same key must observe each other's writes in some
//! order, never interleaved.

use crate::{SessionError, SessionResult};
use serde_json::Value;
use std::{
    collections::HashMap,
    future::Future,
    sync::{Mutex, MutexGuard},
};

/// Key/value storage scoped to one user session.
///
/// Methods are asynchronous so backends may do network I/O; none of them is
/// called while the crate holds a lock.
pub trait SessionStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: Value) -> impl Future<Output = SessionResult<()>> + Send;

    /// Reads the value under `key`.
    fn get(&self, key: &str) -> impl Future<Output = SessionResult<Option<Value>>> + Send;

    /// Removes the value under `key`.
    fn forget(&self, key: &str) -> impl Future<Output = SessionResult<()>> + Send;

    /// Atomically replaces the value under `key`.
    ///
    /// `f` receives the current value and returns the value to store (`None`
    /// removes the key) together with a result handed back to the caller.
    fn update<F, T>(&self, key: &str, f: F) -> impl Future<Output = SessionResult<T>> + Send
    where
        F: FnOnce(Option<Value>) -> (Option<Value>, T) + Send,
        T: Send;

    /// Atomically reads and removes the value under `key`.
    fn take(&self, key: &str) -> impl Future<Output = SessionResult<Option<Value>>> + Send {
        self.update(key, |value| (None, value))
    }
}

/// In-process session store.
#[derive(Debug)]
pub struct MemorySession {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    values: HashMap<String, Value>,
    available: bool,
}

impl MemorySession {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                values: HashMap::new(),
                available: true,
            }),
        }
    }

    /// Makes every later operation fail with [`SessionError::Unavailable`]
    /// while `available` is false.
    pub fn set_available(&self, available: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.available = available;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map_or(0, |inner| inner.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> SessionResult<MutexGuard<'_, Inner>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| SessionError::unavailable("memory session lock poisoned"))?;
        if !inner.available {
            return Err(SessionError::unavailable("memory session marked unavailable"));
        }
        Ok(inner)
    }
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySession {
    async fn put(&self, key: &str, value: Value) -> SessionResult<()> {
        self.lock()?.values.insert(key.to_owned(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> SessionResult<Option<Value>> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    async fn forget(&self, key: &str) -> SessionResult<()> {
        self.lock()?.values.remove(key);
        Ok(())
    }

    async fn update<F, T>(&self, key: &str, f: F) -> SessionResult<T>
    where
        F: FnOnce(Option<Value>) -> (Option<Value>, T) + Send,
        T: Send,
    {
        let mut inner = self.lock()?;
        let (value, output) = f(inner.values.remove(key));
        if let Some(value) = value {
            inner.values.insert(key.to_owned(), value);
        }
        Ok(output)
    }
}
